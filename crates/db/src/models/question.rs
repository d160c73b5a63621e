//! Quiz question entity model and DTO.

use sqlx::FromRow;
use waymark_core::types::{DbId, Timestamp};

/// A question row from the `questions` table.
///
/// `options` is a JSON array of option strings; `correct_answer` is a JSON
/// array of the accepted options (or a single string on legacy rows).
/// Never serialize this struct into quiz-taking responses -- it carries the
/// answers.
#[derive(Debug, Clone, FromRow)]
pub struct Question {
    pub id: DbId,
    pub quiz_id: DbId,
    pub question_text: String,
    pub question_type: String,
    pub options: serde_json::Value,
    pub correct_answer: serde_json::Value,
    pub explanation: Option<String>,
    pub order_index: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new question.
pub struct CreateQuestion {
    pub quiz_id: DbId,
    pub question_text: String,
    pub question_type: String,
    pub options: serde_json::Value,
    pub correct_answer: serde_json::Value,
    pub explanation: Option<String>,
    pub order_index: i32,
}
