//! HTTP-level integration tests for the checkout endpoints.
//!
//! Creating a real Checkout Session calls Stripe, so these tests cover the
//! paths that fail before the outbound request: authentication, missing
//! configuration, and unknown paths. The session parameters themselves are
//! unit tested in `waymark_api::stripe`.

mod common;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use common::{body_json, post_json, post_json_auth};
use sqlx::PgPool;
use waymark_api::auth::password::hash_password;
use waymark_api::auth::session::issue_session;
use waymark_core::tokens::generate_token;
use waymark_db::models::user::CreateUser;
use waymark_db::repositories::UserRepo;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Create a verified user and an active session, returning the token.
async fn auth_token(pool: &PgPool, email: &str) -> String {
    let user = UserRepo::create(
        pool,
        &CreateUser {
            email: email.to_string(),
            password_hash: hash_password("test_password_123!").expect("hashing should succeed"),
            name: None,
            verification_token: generate_token(),
            verification_token_expires_at: Utc::now() + Duration::hours(24),
        },
    )
    .await
    .expect("user creation should succeed");
    UserRepo::mark_email_verified(pool, user.id)
        .await
        .expect("verification should succeed");
    let (token, _session) = issue_session(pool, user.id, 30)
        .await
        .expect("session creation should succeed");
    token
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

/// Checkout requires a session.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_checkout_requires_auth(pool: PgPool) {
    let app = common::build_test_app_with_stripe(pool);
    let body = serde_json::json!({ "path_id": 1 });
    let response = post_json(app, "/api/v1/checkout/path", body).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// Without Stripe configuration, checkout reports a server error rather
/// than silently doing nothing.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_checkout_unconfigured(pool: PgPool) {
    let token = auth_token(&pool, "nostripe@test.com").await;

    let app = common::build_test_app(pool);
    let response =
        post_json_auth(app, "/api/v1/checkout/premium", serde_json::json!({}), &token).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

/// Buying a bundle for a path that does not exist returns 404 before any
/// Stripe call.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_checkout_unknown_path(pool: PgPool) {
    let token = auth_token(&pool, "nopath@test.com").await;

    let app = common::build_test_app_with_stripe(pool);
    let body = serde_json::json!({ "path_id": 999_999 });
    let response = post_json_auth(app, "/api/v1/checkout/path", body, &token).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["code"], "NOT_FOUND");
}
