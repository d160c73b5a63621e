//! Handlers that open Stripe Checkout Sessions.
//!
//! Purchases are never applied here. The session carries the purchase
//! metadata; entitlements land when the `checkout.session.completed` webhook
//! arrives.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use waymark_core::error::CoreError;
use waymark_core::payments::PurchaseKind;
use waymark_core::types::DbId;
use waymark_db::repositories::PathRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;
use crate::stripe::CheckoutParams;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /checkout/path`.
#[derive(Debug, Deserialize)]
pub struct CheckoutPathRequest {
    pub path_id: DbId,
}

/// A created Checkout Session. The client redirects the buyer to `url`.
#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    pub url: String,
    pub session_id: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/checkout/path
///
/// Open a Checkout Session for a single-path quiz bundle.
pub async fn checkout_path(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<CheckoutPathRequest>,
) -> AppResult<Json<DataResponse<CheckoutResponse>>> {
    let stripe = state
        .stripe
        .as_ref()
        .ok_or_else(|| AppError::InternalError("Stripe not configured".into()))?;

    // The purchased path must exist; its slug shapes the cancel URL.
    let path = PathRepo::find_by_id(&state.pool, input.path_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Path",
            id: input.path_id,
        }))?;

    let base = &state.config.public_base_url;
    let success_url = format!("{base}/quizzes?status=success");
    let cancel_url = format!("{base}/p/{}?status=canceled", path.slug);

    let session = stripe
        .create_checkout_session(&CheckoutParams {
            price_id: stripe.path_bundle_price(),
            purchase_type: PurchaseKind::PathBundle.as_str(),
            user_id: user.user_id,
            path_id: Some(path.id),
            success_url: &success_url,
            cancel_url: &cancel_url,
        })
        .await
        .map_err(|e| AppError::InternalError(format!("Stripe checkout error: {e}")))?;

    tracing::info!(
        user_id = user.user_id,
        path_id = path.id,
        session_id = %session.id,
        "Path bundle checkout session created"
    );

    Ok(Json(DataResponse {
        data: CheckoutResponse {
            url: session.url,
            session_id: session.id,
        },
    }))
}

/// POST /api/v1/checkout/premium
///
/// Open a Checkout Session for the all-access premium membership. Already
/// premium users may buy again; Stripe is the system of record for refunds.
pub async fn checkout_premium(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<DataResponse<CheckoutResponse>>> {
    let stripe = state
        .stripe
        .as_ref()
        .ok_or_else(|| AppError::InternalError("Stripe not configured".into()))?;

    let base = &state.config.public_base_url;
    let success_url = format!("{base}/quizzes?status=success");
    let cancel_url = format!("{base}/quizzes?status=canceled");

    let session = stripe
        .create_checkout_session(&CheckoutParams {
            price_id: stripe.premium_price(),
            purchase_type: PurchaseKind::PremiumMembership.as_str(),
            user_id: user.user_id,
            path_id: None,
            success_url: &success_url,
            cancel_url: &cancel_url,
        })
        .await
        .map_err(|e| AppError::InternalError(format!("Stripe checkout error: {e}")))?;

    tracing::info!(
        user_id = user.user_id,
        session_id = %session.id,
        "Premium checkout session created"
    );

    Ok(Json(DataResponse {
        data: CheckoutResponse {
            url: session.url,
            session_id: session.id,
        },
    }))
}
