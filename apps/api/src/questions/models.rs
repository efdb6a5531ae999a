use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Every saved set holds exactly this many questions, numbered 1..=10.
pub const QUESTIONS_PER_SET: usize = 10;

/// Seniority level a question set is generated for.
/// Stored and transmitted as the capitalised word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Junior,
    Mid,
    Senior,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Junior => "Junior",
            Difficulty::Mid => "Mid",
            Difficulty::Senior => "Senior",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownDifficulty(pub String);

impl fmt::Display for UnknownDifficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Difficulty must be Junior, Mid, or Senior (got '{}')",
            self.0
        )
    }
}

impl std::error::Error for UnknownDifficulty {}

impl FromStr for Difficulty {
    type Err = UnknownDifficulty;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Junior" => Ok(Difficulty::Junior),
            "Mid" => Ok(Difficulty::Mid),
            "Senior" => Ok(Difficulty::Senior),
            other => Err(UnknownDifficulty(other.to_string())),
        }
    }
}

/// One question as produced by the generator and as accepted when saving a set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedQuestion {
    pub question: String,
    pub model_answer: String,
    pub tags: Vec<String>,
}

/// One question as submitted by a client when saving a set. Fields are
/// optional so that missing values surface as validation errors.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionInput {
    #[serde(default)]
    pub question: Option<String>,
    #[serde(default)]
    pub model_answer: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

/// Input to `QuestionSetStore::create`, already validated.
#[derive(Debug, Clone)]
pub struct NewQuestionSet {
    pub role: String,
    pub difficulty: Difficulty,
    pub questions: Vec<GeneratedQuestion>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct QuestionSetRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub role: String,
    pub difficulty: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct QuestionRow {
    pub id: Uuid,
    pub question_set_id: Uuid,
    pub question_text: String,
    pub model_answer: String,
    /// JSON-encoded tag list; see `decode_tags`.
    pub tags: String,
    pub question_number: i32,
}

/// A question as returned to clients: tags decoded, position attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredQuestion {
    pub question: String,
    pub model_answer: String,
    pub tags: Vec<String>,
    pub question_number: i32,
}

impl TryFrom<QuestionRow> for StoredQuestion {
    type Error = serde_json::Error;

    fn try_from(row: QuestionRow) -> Result<Self, Self::Error> {
        Ok(StoredQuestion {
            question: row.question_text,
            model_answer: row.model_answer,
            tags: decode_tags(&row.tags)?,
            question_number: row.question_number,
        })
    }
}

/// A set together with its questions ordered by `question_number`.
#[derive(Debug, Clone, Serialize)]
pub struct QuestionSetDetail {
    pub set: QuestionSetRow,
    pub questions: Vec<StoredQuestion>,
}

/// Serializes a tag list for the `questions.tags` column.
pub fn encode_tags(tags: &[String]) -> String {
    // Serializing a string slice cannot fail.
    serde_json::to_string(tags).unwrap_or_else(|_| "[]".to_string())
}

pub fn decode_tags(raw: &str) -> Result<Vec<String>, serde_json::Error> {
    serde_json::from_str(raw)
}
