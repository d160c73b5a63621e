//! Repository for the `quiz_attempts` table.

use sqlx::PgPool;
use waymark_core::types::DbId;

use crate::models::quiz_attempt::{CreateQuizAttempt, QuizAttempt};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, quiz_id, score, total_questions, correct_answers, \
                        answers, completed_at, created_at, updated_at";

/// Provides operations on graded quiz attempts. Attempts are append-only.
pub struct QuizAttemptRepo;

impl QuizAttemptRepo {
    /// Record a graded attempt, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateQuizAttempt,
    ) -> Result<QuizAttempt, sqlx::Error> {
        let query = format!(
            "INSERT INTO quiz_attempts (user_id, quiz_id, score, total_questions, correct_answers, answers)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, QuizAttempt>(&query)
            .bind(input.user_id)
            .bind(input.quiz_id)
            .bind(input.score)
            .bind(input.total_questions)
            .bind(input.correct_answers)
            .bind(&input.answers)
            .fetch_one(pool)
            .await
    }

    /// The user's most recent attempts at one quiz, newest first.
    pub async fn list_recent(
        pool: &PgPool,
        user_id: DbId,
        quiz_id: DbId,
        limit: i64,
    ) -> Result<Vec<QuizAttempt>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM quiz_attempts
             WHERE user_id = $1 AND quiz_id = $2
             ORDER BY completed_at DESC
             LIMIT $3"
        );
        sqlx::query_as::<_, QuizAttempt>(&query)
            .bind(user_id)
            .bind(quiz_id)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// The user's latest attempt per quiz, across all quizzes.
    pub async fn latest_per_quiz(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<QuizAttempt>, sqlx::Error> {
        let query = format!(
            "SELECT DISTINCT ON (quiz_id) {COLUMNS} FROM quiz_attempts
             WHERE user_id = $1
             ORDER BY quiz_id ASC, completed_at DESC"
        );
        sqlx::query_as::<_, QuizAttempt>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }
}
