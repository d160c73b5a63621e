//! Stripe webhook receiver.
//!
//! Verifies the delivery signature over the raw body, then applies
//! `checkout.session.completed` events: path bundles insert a purchase row,
//! premium memberships flip the user flag. Application is idempotent on the
//! payment id, and failures after verification are logged and acknowledged
//! so Stripe does not retry a payload that will never apply.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use chrono::Utc;
use serde_json::{json, Value};
use waymark_core::payments::{
    event_type, parse_checkout_event, plan_application, CheckoutEvent, PurchaseApplication,
    PurchaseKind, EVENT_CHECKOUT_COMPLETED,
};
use waymark_core::signature::verify_signature;
use waymark_db::is_unique_violation;
use waymark_db::models::quiz_purchase::CreateQuizPurchase;
use waymark_db::repositories::{QuizPurchaseRepo, UserRepo};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// POST /stripe/webhook
///
/// Mounted at the root, outside `/api/v1` -- the URL is registered with
/// Stripe and stays stable across API versions.
pub async fn stripe_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> AppResult<Json<Value>> {
    // 1. Without a webhook secret or a signature header there is nothing
    //    to verify.
    let signature = headers
        .get("stripe-signature")
        .and_then(|v| v.to_str().ok());
    let (Some(stripe_cfg), Some(signature)) = (state.config.stripe.as_ref(), signature) else {
        return Err(AppError::BadRequest("Missing signature".into()));
    };

    // 2. Verify over the raw bytes, before any parsing.
    verify_signature(&stripe_cfg.webhook_secret, &body, signature, Utc::now())
        .map_err(|reason| AppError::BadRequest(format!("Webhook Error: {reason}")))?;

    let event: Value = serde_json::from_slice(&body)
        .map_err(|e| AppError::BadRequest(format!("Webhook Error: {e}")))?;

    // 3. Only checkout completions matter; everything else acks untouched.
    if event_type(&event) != Some(EVENT_CHECKOUT_COMPLETED) {
        return Ok(Json(json!({ "received": true })));
    }

    // 4. Malformed events are this platform's misconfiguration, not
    //    Stripe's -- log and ack rather than invite retries.
    let checkout = match parse_checkout_event(&event) {
        Ok(checkout) => checkout,
        Err(reason) => {
            tracing::warn!(%reason, "Invalid webhook data");
            return Ok(Json(json!({ "received": true })));
        }
    };

    // 5. Apply, swallowing database failures into the ack.
    let response = match apply_checkout(&state, &checkout).await {
        Ok(response) => response,
        Err(e) => {
            tracing::error!(
                payment_id = %checkout.payment_id,
                error = %e,
                "Failed to apply checkout event"
            );
            json!({ "received": true })
        }
    };
    Ok(Json(response))
}

/// Apply a verified checkout event to the store, idempotently.
async fn apply_checkout(
    state: &AppState,
    checkout: &CheckoutEvent,
) -> Result<Value, sqlx::Error> {
    // Replay of an applied payment acks as a duplicate.
    if QuizPurchaseRepo::find_by_payment_id(&state.pool, &checkout.payment_id)
        .await?
        .is_some()
    {
        tracing::info!(payment_id = %checkout.payment_id, "Duplicate webhook delivery");
        return Ok(json!({ "received": true, "duplicate": true }));
    }

    match plan_application(checkout) {
        Ok(PurchaseApplication::PathBundle {
            user_id,
            path_id,
            amount_cents,
        }) => {
            let input = CreateQuizPurchase {
                user_id,
                path_id: Some(path_id),
                purchase_type: PurchaseKind::PathBundle.as_str().to_string(),
                amount_cents,
                stripe_payment_id: checkout.payment_id.clone(),
                is_active: true,
            };
            match QuizPurchaseRepo::create(&state.pool, &input).await {
                Ok(purchase) => {
                    tracing::info!(
                        user_id,
                        path_id,
                        purchase_id = purchase.id,
                        "Path bundle purchase applied"
                    );
                }
                // A concurrent delivery won the insert race.
                Err(e) if is_unique_violation(&e, "uq_quiz_purchases_payment") => {
                    return Ok(json!({ "received": true, "duplicate": true }));
                }
                Err(e) => return Err(e),
            }
        }
        Ok(PurchaseApplication::PremiumMembership { user_id }) => {
            UserRepo::set_premium(&state.pool, user_id).await?;
            tracing::info!(user_id, "Premium membership applied");
        }
        Err(reason) => {
            tracing::warn!(%reason, "Invalid webhook data");
        }
    }

    Ok(json!({ "received": true }))
}
