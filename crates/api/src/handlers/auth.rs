//! Handlers for the `/auth` resource (register, verify-email, login, logout).

use axum::extract::{Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use waymark_core::accounts::{normalize_email, validate_registration};
use waymark_core::error::CoreError;
use waymark_core::tokens::{generate_token, hash_token, EMAIL_TOKEN_TTL_HOURS};
use waymark_core::types::Timestamp;
use waymark_db::models::user::{CreateUser, UserResponse};
use waymark_db::repositories::{SessionRepo, UserRepo};

use crate::auth::password::{hash_password, verify_password};
use crate::auth::session::{
    clear_session_cookie, extract_session_token, issue_session, session_cookie,
};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/register`.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub name: Option<String>,
}

/// Response body for a successful registration.
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub user: UserResponse,
    /// Whether the verification email was actually sent. `false` when SMTP
    /// is not configured or delivery failed; the account still exists and
    /// the link is recoverable from the logs.
    pub email_sent: bool,
}

/// Query parameters for `GET /auth/verify-email`.
#[derive(Debug, Deserialize)]
pub struct VerifyEmailQuery {
    pub token: Option<String>,
}

/// Response body for a successful email verification.
#[derive(Debug, Serialize)]
pub struct VerifyEmailResponse {
    pub verified: bool,
    pub message: String,
}

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Successful login response. The token also travels as an `HttpOnly`
/// cookie; the body copy serves API clients using `Authorization: Bearer`.
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub token: String,
    pub expires_at: Timestamp,
    pub user: UserResponse,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/register
///
/// Create an account and send the verification email. The account starts
/// unverified and cannot log in until the emailed link is opened.
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<RegisterResponse>>)> {
    // 1. Validate the submission.
    validate_registration(&input.email, &input.password, &input.confirm_password)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let email = normalize_email(&input.email);

    // 2. Reject duplicate emails up front for a readable message. The
    //    unique constraint on users.email still backstops races.
    if UserRepo::find_by_email(&state.pool, &email).await?.is_some() {
        return Err(AppError::Core(CoreError::Conflict(
            "Email already in use.".into(),
        )));
    }

    // 3. Hash the password and mint the verification token.
    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;
    let token = generate_token();

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            email,
            password_hash,
            name: input
                .name
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty()),
            verification_token: token.clone(),
            verification_token_expires_at: Utc::now() + Duration::hours(EMAIL_TOKEN_TTL_HOURS),
        },
    )
    .await?;

    // 4. Send the verification email, best effort. A delivery failure must
    //    not roll back the account.
    let verify_url = format!(
        "{}/verify-email?token={token}",
        state.config.public_base_url
    );
    let email_sent = match &state.mailer {
        Some(mailer) => {
            match mailer
                .send_verification(&user.email, user.name.as_deref(), &verify_url)
                .await
            {
                Ok(()) => true,
                Err(e) => {
                    tracing::warn!(user_id = user.id, error = %e, "Failed to send verification email");
                    false
                }
            }
        }
        None => {
            tracing::info!(user_id = user.id, %verify_url, "SMTP not configured; verification link logged");
            false
        }
    };

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: RegisterResponse {
                user: UserResponse::from(&user),
                email_sent,
            },
        }),
    ))
}

/// GET /api/v1/auth/verify-email?token=...
///
/// Consume a verification token. Tokens are single-use and expire after
/// 24 hours.
pub async fn verify_email(
    State(state): State<AppState>,
    Query(query): Query<VerifyEmailQuery>,
) -> AppResult<Json<DataResponse<VerifyEmailResponse>>> {
    // 1. A missing or blank token is a malformed link.
    let token = query
        .token
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::Core(CoreError::Validation("Invalid verification link.".into())))?;

    // 2. Look up the unverified holder of a still-valid token.
    let user = UserRepo::find_by_verification_token(&state.pool, &token)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Validation(
                "Invalid or expired verification link. Please try registering again or contact support."
                    .into(),
            ))
        })?;

    // 3. Flip the flag and burn the token.
    UserRepo::mark_email_verified(&state.pool, user.id).await?;

    Ok(Json(DataResponse {
        data: VerifyEmailResponse {
            verified: true,
            message: "Email verified successfully! You can now log in to your account.".into(),
        },
    }))
}

/// POST /api/v1/auth/login
///
/// Authenticate with email + password. Sets the session cookie and returns
/// the token in the body.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<impl IntoResponse> {
    let email = normalize_email(&input.email);

    // 1. Find the user. Unknown email and wrong password produce the same
    //    message so the endpoint does not leak which emails exist.
    let user = UserRepo::find_by_email(&state.pool, &email)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("Invalid credentials.".into())))?;

    // 2. Verify the password.
    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        return Err(AppError::Core(CoreError::Unauthorized(
            "Invalid credentials.".into(),
        )));
    }

    // 3. Unverified accounts cannot log in.
    if !user.email_verified {
        return Err(AppError::Core(CoreError::Unauthorized(
            "Please verify your email address before logging in. Check your email for a verification link."
                .into(),
        )));
    }

    // 4. Mint the session.
    let (token, session) =
        issue_session(&state.pool, user.id, state.config.session_ttl_days).await?;
    let cookie = session_cookie(&token, state.config.session_ttl_days);

    Ok((
        [(header::SET_COOKIE, cookie)],
        Json(DataResponse {
            data: SessionResponse {
                token,
                expires_at: session.expires_at,
                user: UserResponse::from(&user),
            },
        }),
    ))
}

/// POST /api/v1/auth/logout
///
/// Revoke the presented session and clear the cookie. Returns 204.
pub async fn logout(
    State(state): State<AppState>,
    _user: AuthUser,
    headers: HeaderMap,
) -> AppResult<impl IntoResponse> {
    // The extractor already validated the token, so it is present here.
    if let Some(token) = extract_session_token(&headers) {
        SessionRepo::revoke_by_token_hash(&state.pool, &hash_token(&token)).await?;
    }

    Ok((
        StatusCode::NO_CONTENT,
        [(header::SET_COOKIE, clear_session_cookie())],
    ))
}
