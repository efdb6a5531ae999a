//! Question Set Store — owner-scoped persistence of question sets.
//!
//! Every read and write is filtered by the requesting user. A set owned by
//! someone else is reported exactly like a set that does not exist.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::questions::models::{
    encode_tags, Difficulty, GeneratedQuestion, NewQuestionSet, QuestionInput, QuestionRow,
    QuestionSetDetail, QuestionSetRow, StoredQuestion, QUESTIONS_PER_SET,
};

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// Storage backend for question sets.
///
/// Carried in `AppState` as `Arc<dyn QuestionSetStore>`.
#[async_trait]
pub trait QuestionSetStore: Send + Sync {
    /// Inserts the set and its ten questions atomically. Returns the new set id.
    async fn create(&self, owner: Uuid, new_set: NewQuestionSet) -> Result<Uuid, AppError>;

    /// Sets owned by `owner`, newest first. A non-empty `search` keeps only sets
    /// whose role or difficulty contains it (case-sensitive).
    async fn list(
        &self,
        owner: Uuid,
        search: Option<&str>,
    ) -> Result<Vec<QuestionSetRow>, AppError>;

    /// The set with its questions in position order, or `None` when the set is
    /// missing or belongs to another user.
    async fn get(&self, owner: Uuid, set_id: Uuid) -> Result<Option<QuestionSetDetail>, AppError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Validation
// ────────────────────────────────────────────────────────────────────────────

/// Checks a save request before any I/O happens.
pub fn validate_new_set(
    role: Option<String>,
    difficulty: Option<String>,
    questions: Option<Vec<QuestionInput>>,
) -> Result<NewQuestionSet, AppError> {
    let role = role.map(|r| r.trim().to_string()).unwrap_or_default();
    let difficulty = difficulty.unwrap_or_default();

    let questions = match questions {
        Some(q) if !role.is_empty() && !difficulty.is_empty() => q,
        _ => {
            return Err(AppError::Validation(
                "Role, difficulty, and questions array are required".to_string(),
            ))
        }
    };

    let difficulty: Difficulty = difficulty
        .parse()
        .map_err(|e| AppError::Validation(format!("{e}")))?;

    if questions.len() != QUESTIONS_PER_SET {
        return Err(AppError::Validation(format!(
            "Exactly {QUESTIONS_PER_SET} questions are required (got {})",
            questions.len()
        )));
    }

    let questions = questions
        .into_iter()
        .enumerate()
        .map(|(i, q)| {
            let question = q.question.filter(|s| !s.trim().is_empty());
            let model_answer = q.model_answer.filter(|s| !s.trim().is_empty());
            match (question, model_answer) {
                (Some(question), Some(model_answer)) => Ok(GeneratedQuestion {
                    question,
                    model_answer,
                    tags: q.tags.unwrap_or_default(),
                }),
                _ => Err(AppError::Validation(format!(
                    "Question {} must have question text and a model answer",
                    i + 1
                ))),
            }
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(NewQuestionSet {
        role,
        difficulty,
        questions,
    })
}

/// Builds a `LIKE` pattern matching `term` as a literal substring.
pub fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

/// Treats an absent or empty search term as "no filter".
pub fn normalize_search(search: Option<&str>) -> Option<&str> {
    search.filter(|s| !s.is_empty())
}

// ────────────────────────────────────────────────────────────────────────────
// PostgreSQL implementation
// ────────────────────────────────────────────────────────────────────────────

pub struct PgQuestionSetStore {
    pool: PgPool,
}

impl PgQuestionSetStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl QuestionSetStore for PgQuestionSetStore {
    async fn create(&self, owner: Uuid, new_set: NewQuestionSet) -> Result<Uuid, AppError> {
        if new_set.questions.len() != QUESTIONS_PER_SET {
            return Err(AppError::Validation(format!(
                "Exactly {QUESTIONS_PER_SET} questions are required"
            )));
        }

        let set_id = Uuid::new_v4();

        // Dropping `tx` on an early return rolls everything back.
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "INSERT INTO question_sets (id, user_id, role, difficulty) VALUES ($1, $2, $3, $4)",
        )
        .bind(set_id)
        .bind(owner)
        .bind(&new_set.role)
        .bind(new_set.difficulty.as_str())
        .execute(&mut *tx)
        .await?;

        for (i, q) in new_set.questions.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO questions
                    (id, question_set_id, question_text, model_answer, tags, question_number)
                VALUES ($1, $2, $3, $4, $5, $6)
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(set_id)
            .bind(&q.question)
            .bind(&q.model_answer)
            .bind(encode_tags(&q.tags))
            .bind((i + 1) as i32)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        info!("Saved question set {set_id} for user {owner}");
        Ok(set_id)
    }

    async fn list(
        &self,
        owner: Uuid,
        search: Option<&str>,
    ) -> Result<Vec<QuestionSetRow>, AppError> {
        let pattern = normalize_search(search).map(like_pattern);

        Ok(sqlx::query_as::<_, QuestionSetRow>(
            r#"
            SELECT id, user_id, role, difficulty, created_at
            FROM question_sets
            WHERE user_id = $1
              AND ($2::text IS NULL
                   OR role LIKE $2 ESCAPE '\'
                   OR difficulty LIKE $2 ESCAPE '\')
            ORDER BY created_at DESC
            "#,
        )
        .bind(owner)
        .bind(pattern)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn get(&self, owner: Uuid, set_id: Uuid) -> Result<Option<QuestionSetDetail>, AppError> {
        let set = sqlx::query_as::<_, QuestionSetRow>(
            r#"
            SELECT id, user_id, role, difficulty, created_at
            FROM question_sets
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(set_id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await?;

        let Some(set) = set else {
            return Ok(None);
        };

        let rows = sqlx::query_as::<_, QuestionRow>(
            r#"
            SELECT id, question_set_id, question_text, model_answer, tags, question_number
            FROM questions
            WHERE question_set_id = $1
            ORDER BY question_number
            "#,
        )
        .bind(set_id)
        .fetch_all(&self.pool)
        .await?;

        let questions = rows
            .into_iter()
            .map(StoredQuestion::try_from)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| {
                AppError::Internal(anyhow::anyhow!("Corrupt tags in question set {set_id}: {e}"))
            })?;

        Ok(Some(QuestionSetDetail { set, questions }))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// In-memory implementation for tests
// ────────────────────────────────────────────────────────────────────────────
