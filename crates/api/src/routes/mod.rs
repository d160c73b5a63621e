pub mod auth;
pub mod catalog;
pub mod checkout;
pub mod health;
pub mod progress;
pub mod quizzes;
pub mod webhooks;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register               register (public)
/// /auth/verify-email           consume verification token (public)
/// /auth/login                  login (public)
/// /auth/logout                 logout (requires auth)
///
/// /paths                       published catalog (public)
/// /paths/{slug}                path detail with caller progress (public)
///
/// /progress                    toggle resource completion (POST, auth)
/// /me                          dashboard: activity, paths, weekly goal (auth)
///
/// /quizzes                     entitled quizzes with latest attempts (auth)
/// /modules/{id}/quiz           quiz summary + access state (auth)
/// /modules/{id}/quiz/take      questions, answers stripped (entitlement)
/// /modules/{id}/quiz/submit    grade + record attempt (POST, entitlement)
///
/// /checkout/path               open path-bundle Checkout Session (POST, auth)
/// /checkout/premium            open premium Checkout Session (POST, auth)
/// ```
///
/// `/health` and `/stripe/webhook` mount at the root instead; see
/// [`health`] and [`webhooks`].
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Account lifecycle: register, verify, login, logout.
        .nest("/auth", auth::router())
        // Path catalog and detail.
        .nest("/paths", catalog::router())
        // Per-resource completion toggling.
        .nest("/progress", progress::router())
        // The signed-in dashboard.
        .nest("/me", progress::dashboard_router())
        // Entitled quiz listing.
        .nest("/quizzes", quizzes::router())
        // Module-scoped quiz summary / take / submit.
        .nest("/modules", quizzes::module_router())
        // Stripe Checkout Session creation.
        .nest("/checkout", checkout::router())
}
