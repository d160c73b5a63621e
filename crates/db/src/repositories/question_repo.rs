//! Repository for the `questions` table.

use sqlx::PgPool;
use waymark_core::types::DbId;

use crate::models::question::{CreateQuestion, Question};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, quiz_id, question_text, question_type, options, correct_answer, \
                        explanation, order_index, created_at, updated_at";

/// Provides CRUD operations for quiz questions.
pub struct QuestionRepo;

impl QuestionRepo {
    /// Insert a new question, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateQuestion) -> Result<Question, sqlx::Error> {
        let query = format!(
            "INSERT INTO questions (quiz_id, question_text, question_type, options, correct_answer, explanation, order_index)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Question>(&query)
            .bind(input.quiz_id)
            .bind(&input.question_text)
            .bind(&input.question_type)
            .bind(&input.options)
            .bind(&input.correct_answer)
            .bind(&input.explanation)
            .bind(input.order_index)
            .fetch_one(pool)
            .await
    }

    /// List a quiz's questions in display order.
    pub async fn list_by_quiz(pool: &PgPool, quiz_id: DbId) -> Result<Vec<Question>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM questions WHERE quiz_id = $1 ORDER BY order_index ASC, id ASC"
        );
        sqlx::query_as::<_, Question>(&query)
            .bind(quiz_id)
            .fetch_all(pool)
            .await
    }
}
