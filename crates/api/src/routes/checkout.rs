//! Route definitions for Stripe Checkout.

use axum::routing::post;
use axum::Router;

use crate::handlers::checkout;
use crate::state::AppState;

/// Routes mounted at `/checkout`.
///
/// ```text
/// POST /path     -> checkout_path    (requires auth)
/// POST /premium  -> checkout_premium (requires auth)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/path", post(checkout::checkout_path))
        .route("/premium", post(checkout::checkout_premium))
}
