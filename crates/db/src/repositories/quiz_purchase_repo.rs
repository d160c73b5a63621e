//! Repository for the `quiz_purchases` table.

use sqlx::PgPool;
use waymark_core::types::DbId;

use crate::models::quiz_purchase::{CreateQuizPurchase, QuizPurchase};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, path_id, purchase_type, amount_cents, stripe_payment_id, \
                        is_active, created_at, updated_at";

/// Provides operations on applied purchases.
pub struct QuizPurchaseRepo;

impl QuizPurchaseRepo {
    /// Record an applied purchase, returning the created row.
    ///
    /// Fails with a unique violation on `uq_quiz_purchases_payment` when the
    /// payment was already applied; the webhook applier treats that as
    /// success.
    pub async fn create(
        pool: &PgPool,
        input: &CreateQuizPurchase,
    ) -> Result<QuizPurchase, sqlx::Error> {
        let query = format!(
            "INSERT INTO quiz_purchases (user_id, path_id, purchase_type, amount_cents, stripe_payment_id, is_active)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, QuizPurchase>(&query)
            .bind(input.user_id)
            .bind(input.path_id)
            .bind(&input.purchase_type)
            .bind(input.amount_cents)
            .bind(&input.stripe_payment_id)
            .bind(input.is_active)
            .fetch_one(pool)
            .await
    }

    /// Find a purchase by its Stripe payment id (the idempotency key).
    pub async fn find_by_payment_id(
        pool: &PgPool,
        stripe_payment_id: &str,
    ) -> Result<Option<QuizPurchase>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM quiz_purchases WHERE stripe_payment_id = $1");
        sqlx::query_as::<_, QuizPurchase>(&query)
            .bind(stripe_payment_id)
            .fetch_optional(pool)
            .await
    }

    /// The user's active purchases.
    pub async fn list_active_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<QuizPurchase>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM quiz_purchases WHERE user_id = $1 AND is_active = true"
        );
        sqlx::query_as::<_, QuizPurchase>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }
}
