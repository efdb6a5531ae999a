//! Question Generator — turns a role/difficulty pair into exactly ten
//! interview questions via the LLM.
//!
//! Flow: render prompt → call_json → decode payload shape → count check →
//!       per-record normalisation.
//!
//! The count check is strict (anything but 10 fails) while individual
//! records are patched up with defaults. Both rules are relied upon by
//! clients and must be kept as they are.

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};

use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::llm_client::{LlmClient, LlmError};
use crate::questions::models::{Difficulty, GeneratedQuestion, QUESTIONS_PER_SET};
use crate::questions::prompts::{GENERATION_PROMPT_TEMPLATE, GENERATION_SYSTEM};

const MISSING_ANSWER: &str = "No answer provided";

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    Upstream(#[from] LlmError),

    #[error("Unexpected response shape: {0}")]
    Decode(String),

    #[error("Expected {expected} questions, got {got}")]
    CountMismatch { expected: usize, got: usize },
}

// ────────────────────────────────────────────────────────────────────────────
// Payload decoding
// ────────────────────────────────────────────────────────────────────────────

/// Shapes the model is allowed to answer with. Records stay untyped so one
/// odd field never rejects the whole batch.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum GenerationPayload {
    Wrapped { questions: Vec<Value> },
    Bare(Vec<Value>),
}

impl GenerationPayload {
    fn into_records(self) -> Vec<Value> {
        match self {
            GenerationPayload::Wrapped { questions } | GenerationPayload::Bare(questions) => {
                questions
            }
        }
    }
}

fn decode_payload(value: Value) -> Result<Vec<Value>, GenerationError> {
    serde_json::from_value::<GenerationPayload>(value)
        .map(GenerationPayload::into_records)
        .map_err(|_| {
            GenerationError::Decode(
                "expected a JSON array of questions or an object with a \"questions\" array"
                    .to_string(),
            )
        })
}

/// First non-blank string among `keys`. Non-string values count as missing.
fn text_field(record: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| record.get(*key).and_then(Value::as_str))
        .find(|v| !v.trim().is_empty())
        .map(str::to_string)
}

fn tag_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Scalars inside a tag list are kept as text, anything else is dropped.
/// A lone scalar becomes a one-element list.
fn tags_field(record: &Value) -> Vec<String> {
    match record.get("tags") {
        Some(Value::Array(items)) => items.iter().filter_map(tag_text).collect(),
        Some(single) => tag_text(single).into_iter().collect(),
        None => Vec::new(),
    }
}

/// Fills in missing per-record fields. `index` is 0-based.
fn normalize(record: &Value, index: usize, difficulty: Difficulty) -> GeneratedQuestion {
    let mut tags = tags_field(record);
    if tags.is_empty() {
        tags.push(difficulty.to_string());
    }

    GeneratedQuestion {
        question: text_field(record, &["question"])
            .unwrap_or_else(|| format!("Question {}", index + 1)),
        model_answer: text_field(record, &["modelAnswer", "model_answer"])
            .unwrap_or_else(|| MISSING_ANSWER.to_string()),
        tags,
    }
}

/// Validates and normalises a parsed model response.
pub fn questions_from_payload(
    value: Value,
    difficulty: Difficulty,
) -> Result<Vec<GeneratedQuestion>, GenerationError> {
    let raw = decode_payload(value)?;

    if raw.len() != QUESTIONS_PER_SET {
        return Err(GenerationError::CountMismatch {
            expected: QUESTIONS_PER_SET,
            got: raw.len(),
        });
    }

    Ok(raw
        .into_iter()
        .enumerate()
        .map(|(i, record)| normalize(&record, i, difficulty))
        .collect())
}

pub fn render_prompt(role: &str, difficulty: Difficulty) -> String {
    GENERATION_PROMPT_TEMPLATE
        .replace("{role}", role)
        .replace("{difficulty}", difficulty.as_str())
}

// ────────────────────────────────────────────────────────────────────────────
// Generation
// ────────────────────────────────────────────────────────────────────────────

/// Generates exactly ten questions for `role` at `difficulty`.
pub async fn generate_questions(
    llm: &LlmClient,
    role: &str,
    difficulty: Difficulty,
) -> Result<Vec<GeneratedQuestion>, GenerationError> {
    let role = role.trim();
    if role.is_empty() {
        return Err(GenerationError::InvalidInput(
            "Role and difficulty are required".to_string(),
        ));
    }

    info!("Generating questions: role={role:?} difficulty={difficulty}");

    let prompt = render_prompt(role, difficulty);
    let system = format!("{GENERATION_SYSTEM} {JSON_ONLY_SYSTEM}");
    let value: Value = llm.call_json(&prompt, &system).await?;

    let questions = questions_from_payload(value, difficulty).inspect_err(|e| {
        warn!("Rejected generation response: {e}");
    })?;

    info!("Generated {} questions", questions.len());
    Ok(questions)
}
