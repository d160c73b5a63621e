//! Route definitions for the `/paths` catalog.

use axum::routing::get;
use axum::Router;

use crate::handlers::catalog;
use crate::state::AppState;

/// Routes mounted at `/paths`.
///
/// ```text
/// GET /         -> list_paths (public, progress when authenticated)
/// GET /{slug}   -> get_path   (public, progress when authenticated)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(catalog::list_paths))
        .route("/{slug}", get(catalog::get_path))
}
