//! Route definitions for the quiz surface.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::quizzes;
use crate::state::AppState;

/// Routes mounted at `/quizzes`.
///
/// ```text
/// GET /  -> list_quizzes (requires auth, entitlement-filtered)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(quizzes::list_quizzes))
}

/// Module-scoped quiz routes, mounted at `/modules`.
///
/// ```text
/// GET  /{module_id}/quiz         -> quiz_summary (requires auth)
/// GET  /{module_id}/quiz/take    -> take_quiz    (requires entitlement)
/// POST /{module_id}/quiz/submit  -> submit_quiz  (requires entitlement)
/// ```
pub fn module_router() -> Router<AppState> {
    Router::new()
        .route("/{module_id}/quiz", get(quizzes::quiz_summary))
        .route("/{module_id}/quiz/take", get(quizzes::take_quiz))
        .route("/{module_id}/quiz/submit", post(quizzes::submit_quiz))
}
