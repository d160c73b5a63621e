//! Quiz purchase entity model and DTO.

use serde::Serialize;
use sqlx::FromRow;
use waymark_core::types::{DbId, Timestamp};

/// A purchase row from the `quiz_purchases` table. `stripe_payment_id` is
/// unique and serves as the webhook idempotency key.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct QuizPurchase {
    pub id: DbId,
    pub user_id: DbId,
    pub path_id: Option<DbId>,
    pub purchase_type: String,
    pub amount_cents: i64,
    pub stripe_payment_id: String,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for recording an applied purchase.
pub struct CreateQuizPurchase {
    pub user_id: DbId,
    pub path_id: Option<DbId>,
    pub purchase_type: String,
    pub amount_cents: i64,
    pub stripe_payment_id: String,
    pub is_active: bool,
}
