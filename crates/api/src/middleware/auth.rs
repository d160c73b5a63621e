//! Session-based authentication extractors for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use waymark_core::error::CoreError;
use waymark_core::tokens::hash_token;
use waymark_core::types::DbId;
use waymark_db::repositories::{SessionRepo, UserRepo};

use crate::auth::session::extract_session_token;
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated user resolved from a session token.
///
/// The token is accepted either as an `Authorization: Bearer <token>` header
/// or in the `waymark_session` cookie. Use this as an extractor parameter in
/// any handler that requires a logged-in user:
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = user.user_id, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The user's internal database id.
    pub user_id: DbId,
    /// Whether the user holds a premium membership.
    pub is_premium: bool,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_session_token(&parts.headers).ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized("Missing session token".into()))
        })?;

        let session = SessionRepo::find_active_by_token_hash(&state.pool, &hash_token(&token))
            .await?
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized("Invalid or expired session".into()))
            })?;

        let user = UserRepo::find_by_id(&state.pool, session.user_id)
            .await?
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized("Invalid or expired session".into()))
            })?;

        Ok(AuthUser {
            user_id: user.id,
            is_premium: user.is_premium,
        })
    }
}

/// Optional variant of [`AuthUser`] for routes that render for both guests
/// and logged-in users.
///
/// A missing or invalid token yields `MaybeAuthUser(None)` instead of a 401;
/// database failures still surface as errors.
#[derive(Debug, Clone)]
pub struct MaybeAuthUser(pub Option<AuthUser>);

impl FromRequestParts<AppState> for MaybeAuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(token) = extract_session_token(&parts.headers) else {
            return Ok(MaybeAuthUser(None));
        };

        let Some(session) =
            SessionRepo::find_active_by_token_hash(&state.pool, &hash_token(&token)).await?
        else {
            return Ok(MaybeAuthUser(None));
        };

        let Some(user) = UserRepo::find_by_id(&state.pool, session.user_id).await? else {
            return Ok(MaybeAuthUser(None));
        };

        Ok(MaybeAuthUser(Some(AuthUser {
            user_id: user.id,
            is_premium: user.is_premium,
        })))
    }
}
