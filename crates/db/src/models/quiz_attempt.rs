//! Quiz attempt entity model and DTO.

use serde::Serialize;
use sqlx::FromRow;
use waymark_core::types::{DbId, Timestamp};

/// An attempt row from the `quiz_attempts` table. Attempts are append-only;
/// `answers` holds the graded per-question breakdown as JSON.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct QuizAttempt {
    pub id: DbId,
    pub user_id: DbId,
    pub quiz_id: DbId,
    pub score: i32,
    pub total_questions: i32,
    pub correct_answers: i32,
    pub answers: serde_json::Value,
    pub completed_at: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for recording a graded attempt.
pub struct CreateQuizAttempt {
    pub user_id: DbId,
    pub quiz_id: DbId,
    pub score: i32,
    pub total_questions: i32,
    pub correct_answers: i32,
    pub answers: serde_json::Value,
}
