//! Repository for the `quizzes` table.

use sqlx::PgPool;
use waymark_core::types::DbId;

use crate::models::quiz::{CreateQuiz, Quiz, QuizListingRow};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, module_id, title, description, question_count, \
                        individual_price_cents, created_at, updated_at";

/// Columns for the joined listing shape.
const LISTING_COLUMNS: &str = "q.id, q.module_id, m.path_id, q.title, \
                                m.title AS module_title, p.title AS path_title, \
                                q.question_count";

/// Provides CRUD operations for quizzes.
pub struct QuizRepo;

impl QuizRepo {
    /// Insert a new quiz, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateQuiz) -> Result<Quiz, sqlx::Error> {
        let query = format!(
            "INSERT INTO quizzes (module_id, title, description, question_count, individual_price_cents)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Quiz>(&query)
            .bind(input.module_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.question_count)
            .bind(input.individual_price_cents)
            .fetch_one(pool)
            .await
    }

    /// Find the quiz attached to a module, if any.
    pub async fn find_by_module(pool: &PgPool, module_id: DbId) -> Result<Option<Quiz>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM quizzes WHERE module_id = $1");
        sqlx::query_as::<_, Quiz>(&query)
            .bind(module_id)
            .fetch_optional(pool)
            .await
    }

    /// List every quiz with module and path context, in catalog order.
    pub async fn list_with_context(pool: &PgPool) -> Result<Vec<QuizListingRow>, sqlx::Error> {
        let query = format!(
            "SELECT {LISTING_COLUMNS}
             FROM quizzes q
             JOIN modules m ON m.id = q.module_id
             JOIN paths p ON p.id = m.path_id
             ORDER BY m.path_id ASC, q.module_id ASC"
        );
        sqlx::query_as::<_, QuizListingRow>(&query)
            .fetch_all(pool)
            .await
    }

    /// List the quizzes belonging to the given paths, in catalog order.
    pub async fn list_with_context_for_paths(
        pool: &PgPool,
        path_ids: &[DbId],
    ) -> Result<Vec<QuizListingRow>, sqlx::Error> {
        let query = format!(
            "SELECT {LISTING_COLUMNS}
             FROM quizzes q
             JOIN modules m ON m.id = q.module_id
             JOIN paths p ON p.id = m.path_id
             WHERE m.path_id = ANY($1)
             ORDER BY m.path_id ASC, q.module_id ASC"
        );
        sqlx::query_as::<_, QuizListingRow>(&query)
            .bind(path_ids)
            .fetch_all(pool)
            .await
    }
}
