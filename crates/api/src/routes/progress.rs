//! Route definitions for progress tracking and the dashboard.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::progress;
use crate::state::AppState;

/// Routes mounted at `/progress`.
///
/// ```text
/// POST /  -> toggle (requires auth)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", post(progress::toggle))
}

/// Routes mounted at `/me`.
///
/// ```text
/// GET /  -> me (requires auth)
/// ```
pub fn dashboard_router() -> Router<AppState> {
    Router::new().route("/", get(progress::me))
}
