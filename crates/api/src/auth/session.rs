//! Opaque session token issuance and transport.
//!
//! A session token is minted at login, handed to the client both as an
//! `HttpOnly` cookie (for the server-rendered frontend) and in the response
//! body (for API clients that prefer a `Bearer` header), and stored server
//! side only as a SHA-256 digest.

use axum::http::{header, HeaderMap};
use chrono::{Duration, Utc};
use sqlx::PgPool;
use waymark_core::tokens::{generate_token, hash_token};
use waymark_core::DbId;
use waymark_db::models::session::{CreateSession, Session};
use waymark_db::repositories::SessionRepo;

/// Cookie name carrying the session token.
pub const SESSION_COOKIE: &str = "waymark_session";

/// Mint a fresh session for `user_id` and persist its digest.
///
/// Returns the plaintext token (for the client) alongside the stored row.
pub async fn issue_session(
    pool: &PgPool,
    user_id: DbId,
    ttl_days: i64,
) -> Result<(String, Session), sqlx::Error> {
    let token = generate_token();
    let session = SessionRepo::create(
        pool,
        &CreateSession {
            user_id,
            token_hash: hash_token(&token),
            expires_at: Utc::now() + Duration::days(ttl_days),
        },
    )
    .await?;
    Ok((token, session))
}

/// Build the `Set-Cookie` value that installs the session token.
pub fn session_cookie(token: &str, ttl_days: i64) -> String {
    format!(
        "{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        ttl_days * 86_400
    )
}

/// Build the `Set-Cookie` value that removes the session cookie.
pub fn clear_session_cookie() -> String {
    format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}

/// Pull the session token from a request, if any.
///
/// `Authorization: Bearer <token>` wins over the cookie so API clients can
/// act on behalf of a different session than the browser holds.
pub fn extract_session_token(headers: &HeaderMap) -> Option<String> {
    if let Some(value) = headers.get(header::AUTHORIZATION) {
        if let Some(token) = value.to_str().ok().and_then(|v| v.strip_prefix("Bearer ")) {
            if !token.is_empty() {
                return Some(token.to_string());
            }
        }
    }

    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;
    cookies.split(';').find_map(|pair| {
        pair.trim()
            .strip_prefix(SESSION_COOKIE)?
            .strip_prefix('=')
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    })
}
