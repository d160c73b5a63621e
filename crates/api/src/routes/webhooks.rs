//! Route definitions for inbound webhooks.

use axum::routing::post;
use axum::Router;

use crate::handlers::webhooks;
use crate::state::AppState;

/// Webhook routes (intended for root-level, NOT under `/api/v1` -- the
/// URLs are registered with external services).
///
/// ```text
/// POST /stripe/webhook  -> stripe_webhook (signature-verified)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/stripe/webhook", post(webhooks::stripe_webhook))
}
