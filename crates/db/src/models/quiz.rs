//! Quiz entity model and DTOs.

use serde::Serialize;
use sqlx::FromRow;
use waymark_core::types::{DbId, Timestamp};

/// A quiz row from the `quizzes` table. One quiz per module.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Quiz {
    pub id: DbId,
    pub module_id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub question_count: i32,
    pub individual_price_cents: Option<i64>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new quiz.
pub struct CreateQuiz {
    pub module_id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub question_count: i32,
    pub individual_price_cents: Option<i64>,
}

/// A quiz joined with its module and path context, for the quiz listing.
#[derive(Debug, Clone, FromRow)]
pub struct QuizListingRow {
    pub id: DbId,
    pub module_id: DbId,
    pub path_id: DbId,
    pub title: String,
    pub module_title: String,
    pub path_title: String,
    pub question_count: i32,
}
