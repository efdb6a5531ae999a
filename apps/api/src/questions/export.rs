//! CSV export of a stored question set.

use uuid::Uuid;

use crate::errors::AppError;
use crate::questions::models::QuestionSetDetail;

const HEADER: [&str; 4] = ["Question Number", "Question", "Model Answer", "Tags"];
const TAG_SEPARATOR: &str = ", ";

/// Serializes the set's questions, in position order, as CSV bytes.
/// Identical input always yields identical bytes.
pub fn export_csv(detail: &QuestionSetDetail) -> Result<Vec<u8>, AppError> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(HEADER).map_err(csv_error)?;

    let mut questions: Vec<_> = detail.questions.iter().collect();
    questions.sort_by_key(|q| q.question_number);

    for q in questions {
        writer
            .write_record([
                q.question_number.to_string().as_str(),
                q.question.as_str(),
                q.model_answer.as_str(),
                q.tags.join(TAG_SEPARATOR).as_str(),
            ])
            .map_err(csv_error)?;
    }

    writer
        .into_inner()
        .map_err(|e| AppError::Internal(anyhow::anyhow!("CSV flush failed: {e}")))
}

pub fn export_filename(set_id: Uuid) -> String {
    format!("question-set-{set_id}.csv")
}

fn csv_error(e: csv::Error) -> AppError {
    AppError::Internal(anyhow::anyhow!("CSV write failed: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::Utc;

    use crate::questions::models::{QuestionSetRow, StoredQuestion};

    fn question(n: i32, q: &str, a: &str, tags: &[&str]) -> StoredQuestion {
        StoredQuestion {
            question: q.to_string(),
            model_answer: a.to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            question_number: n,
        }
    }

    fn detail(questions: Vec<StoredQuestion>) -> QuestionSetDetail {
        QuestionSetDetail {
            set: QuestionSetRow {
                id: Uuid::new_v4(),
                user_id: Uuid::new_v4(),
                role: "Dev".into(),
                difficulty: "Mid".into(),
                created_at: Utc::now(),
            },
            questions,
        }
    }

    #[test]
    fn test_export_matches_expected_layout() {
        let d = detail(vec![
            question(1, "Q1", "A1", &["x"]),
            question(2, "Q2", "A2", &["y", "z"]),
        ]);
        let csv = String::from_utf8(export_csv(&d).unwrap()).unwrap();
        assert_eq!(
            csv,
            "Question Number,Question,Model Answer,Tags\n1,Q1,A1,x\n2,Q2,A2,\"y, z\"\n"
        );
    }

    #[test]
    fn test_export_orders_by_question_number() {
        let d = detail(vec![
            question(2, "second", "b", &["t"]),
            question(1, "first", "a", &["t"]),
        ]);
        let csv = String::from_utf8(export_csv(&d).unwrap()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[1], "1,first,a,t");
        assert_eq!(lines[2], "2,second,b,t");
    }

    #[test]
    fn test_export_quotes_embedded_quotes_and_newlines() {
        let d = detail(vec![question(1, "Say \"hi\"", "line1\nline2", &[])]);
        let csv = String::from_utf8(export_csv(&d).unwrap()).unwrap();
        assert!(csv.ends_with("1,\"Say \"\"hi\"\"\",\"line1\nline2\",\n"));
    }

    #[test]
    fn test_export_is_deterministic() {
        let d = detail(vec![question(1, "Q", "A", &["a", "b"])]);
        assert_eq!(export_csv(&d).unwrap(), export_csv(&d).unwrap());
    }

    #[test]
    fn test_filename_includes_set_id() {
        let id = Uuid::nil();
        assert_eq!(
            export_filename(id),
            "question-set-00000000-0000-0000-0000-000000000000.csv"
        );
    }
}
