//! Shared helpers for HTTP-level integration tests.
//!
//! Builds the real application router (same middleware stack as `main.rs`)
//! on top of a `#[sqlx::test]`-provided pool, plus small request helpers
//! around `tower::ServiceExt::oneshot`.

// Each test binary compiles this module separately and uses a subset of it.
#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use waymark_api::config::{ServerConfig, StripeConfig};
use waymark_api::router::build_app_router;
use waymark_api::state::AppState;
use waymark_api::stripe::StripeClient;

/// Webhook signing secret used by [`build_test_app_with_stripe`].
pub const TEST_WEBHOOK_SECRET: &str = "whsec_test_secret";

/// Build a test `ServerConfig` with safe defaults and Stripe disabled.
///
/// Uses `http://localhost:5173` as CORS origin (matching the dev default)
/// and a 30-second request timeout.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        public_base_url: "http://localhost:3000".to_string(),
        session_ttl_days: 30,
        stripe: None,
    }
}

/// Build the full application router with all middleware layers, using the
/// given database pool. Stripe and SMTP are left unconfigured.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        stripe: None,
        mailer: None,
    };
    build_app_router(state, &config)
}

/// Like [`build_test_app`] but with Stripe configured, so checkout and
/// webhook routes are live. Webhook payloads must be signed with
/// [`TEST_WEBHOOK_SECRET`].
pub fn build_test_app_with_stripe(pool: PgPool) -> Router {
    let stripe_config = StripeConfig {
        secret_key: "sk_test_key".to_string(),
        webhook_secret: TEST_WEBHOOK_SECRET.to_string(),
        price_path_bundle: "price_bundle_test".to_string(),
        price_premium: "price_premium_test".to_string(),
    };
    let config = ServerConfig {
        stripe: Some(stripe_config.clone()),
        ..test_config()
    };
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        stripe: Some(Arc::new(StripeClient::new(stripe_config))),
        mailer: None,
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

/// Send a GET request to `path`.
pub async fn get(app: Router, path: &str) -> Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(path)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Send a GET request with a `Authorization: Bearer` session token.
pub async fn get_auth(app: Router, path: &str, token: &str) -> Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(path)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Send a POST request with a JSON body.
pub async fn post_json(app: Router, path: &str, body: serde_json::Value) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(path)
        .header(CONTENT_TYPE, "application/json")
        .header(ACCEPT, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Send a POST request with a JSON body and a bearer session token.
pub async fn post_json_auth(
    app: Router,
    path: &str,
    body: serde_json::Value,
    token: &str,
) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(path)
        .header(CONTENT_TYPE, "application/json")
        .header(ACCEPT, "application/json")
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should collect")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be valid JSON")
}
