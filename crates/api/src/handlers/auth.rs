//! Handlers for the `/api/auth` resource (sign-in, sign-up, validate,
//! sign-out, password reset).

use axum::extract::State;
use axum::http::header::SET_COOKIE;
use axum::http::{HeaderMap, HeaderValue};
use axum::response::{IntoResponse, Response};
use axum::Json;
use gatehouse_core::activity::ActivityType;
use gatehouse_core::error::CoreError;
use gatehouse_core::types::Id;
use gatehouse_db::models::user::{CreateUser, User, UserResponse};
use gatehouse_db::repositories::{SessionRepo, UserRepo};
use serde::{Deserialize, Serialize};
use serde_json::json;
use validator::ValidateEmail;

use crate::audit::{self, RequestContext};
use crate::auth::jwt::{validate_token, Claims};
use crate::auth::password::{hash_password, validate_password_strength, verify_password};
use crate::auth::token::{self, IssuedToken};
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Cookie lifetime, matching the token and session TTL.
const COOKIE_MAX_AGE_SECS: i64 = 24 * 60 * 60;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /api/auth/signin`.
///
/// Fields are optional so that missing input surfaces as a 400 validation
/// error rather than a deserialization rejection.
#[derive(Debug, Deserialize)]
pub struct SigninRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Request body for `POST /api/auth/signup`.
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
}

/// Request body for `POST /api/auth/reset-password`.
#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub email: Option<String>,
}

/// Successful authentication response returned by sign-in and sign-up.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    pub session_id: Id,
    pub user: UserResponse,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/auth/signin
///
/// Authenticate with email + password. Sets the `authToken` and `sessionId`
/// cookies and returns the token/session pair. Unknown email and wrong
/// password are indistinguishable to the caller.
pub async fn signin(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(input): Json<SigninRequest>,
) -> AppResult<Response> {
    let ctx = RequestContext::from_headers(&headers);

    let (Some(email), Some(password)) = (non_empty(input.email), non_empty(input.password))
    else {
        return Err(CoreError::Validation("Missing required fields".into()).into());
    };

    let Some(user) = UserRepo::find_by_email(&state.pool, &email).await? else {
        audit::record(
            &state,
            ActivityType::AuthFailedAttempt,
            None,
            &ctx,
            json!({ "email": email, "reason": "unknown_email" }),
        )
        .await;
        return Err(invalid_credentials());
    };

    if !verify_password(&password, &user.password_hash) {
        audit::record(
            &state,
            ActivityType::AuthFailedAttempt,
            Some(user.id),
            &ctx,
            json!({ "email": email, "reason": "wrong_password" }),
        )
        .await;
        return Err(invalid_credentials());
    }

    let issued = token::issue(&state.pool, &state.config.jwt, user.id).await?;

    audit::record(
        &state,
        ActivityType::AuthLogin,
        Some(user.id),
        &ctx,
        json!({ "sessionId": issued.session_id }),
    )
    .await;

    auth_success_response(&state, &user, issued)
}

/// POST /api/auth/signup
///
/// Register a new account (role defaults to USER), then sign it in.
pub async fn signup(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(input): Json<SignupRequest>,
) -> AppResult<Response> {
    let ctx = RequestContext::from_headers(&headers);

    let (Some(email), Some(password)) = (non_empty(input.email), non_empty(input.password))
    else {
        return Err(CoreError::Validation("Missing required fields".into()).into());
    };
    if !email.validate_email() {
        return Err(CoreError::Validation("Invalid email address".into()).into());
    }
    validate_password_strength(&password)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    // Fast-path check for a friendly message; the unique constraint still
    // decides the race between concurrent sign-ups.
    if UserRepo::find_by_email(&state.pool, &email).await?.is_some() {
        return Err(user_exists());
    }

    let password_hash = hash_password(&password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let create = CreateUser {
        email,
        password_hash,
        name: input.name.filter(|n| !n.is_empty()),
    };
    let user = match UserRepo::create(&state.pool, &create).await {
        Ok(user) => user,
        Err(sqlx::Error::Database(db_err)) if db_err.code().as_deref() == Some("23505") => {
            return Err(user_exists());
        }
        Err(err) => return Err(err.into()),
    };

    audit::record(
        &state,
        ActivityType::UserCreated,
        Some(user.id),
        &ctx,
        json!({ "email": user.email }),
    )
    .await;

    let issued = token::issue(&state.pool, &state.config.jwt, user.id).await?;

    auth_success_response(&state, &user, issued)
}

/// GET /api/auth/validate
///
/// Validate the Bearer token and its live-session pairing, returning the
/// token claims. 401 for every failure mode.
pub async fn validate(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> AppResult<Json<Claims>> {
    let token = bearer_token(&headers)
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("Missing or invalid token".into())))?;

    let rejection = || AppError::Core(CoreError::Unauthorized("Invalid token".into()));

    let claims = validate_token(token, &state.config.jwt).map_err(|_| rejection())?;

    // The signature alone is not enough: the token must still be paired
    // with a live session, so revoked tokens fail here.
    let session = SessionRepo::get_by_token(&state.pool, token)
        .await?
        .ok_or_else(rejection)?;
    if session.user_id != claims.sub {
        return Err(rejection());
    }

    Ok(Json(claims))
}

/// POST /api/auth/signout
///
/// Invalidate the session named by the `sessionId` cookie and clear both
/// auth cookies. Responds 200 even when the session is already gone.
pub async fn signout(State(state): State<AppState>, headers: HeaderMap) -> AppResult<Response> {
    let ctx = RequestContext::from_headers(&headers);

    let session_id = cookie_value(&headers, "sessionId").and_then(|v| v.parse::<Id>().ok());
    if let Some(session_id) = session_id {
        if let Some(session) = SessionRepo::get(&state.pool, session_id).await? {
            SessionRepo::invalidate(&state.pool, session_id).await?;
            audit::record(
                &state,
                ActivityType::AuthLogout,
                Some(session.user_id),
                &ctx,
                json!({ "sessionId": session_id }),
            )
            .await;
        }
    }

    let mut response = Json(json!({ "message": "Signed out" })).into_response();
    append_cookie(&mut response, &clear_cookie("authToken"))?;
    append_cookie(&mut response, &clear_cookie("sessionId"))?;
    Ok(response)
}

/// POST /api/auth/reset-password
///
/// Always responds 200 with the same message whether or not the account
/// exists, to prevent user enumeration. Existing accounts get an audit
/// record.
pub async fn reset_password(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(input): Json<ResetPasswordRequest>,
) -> AppResult<Json<serde_json::Value>> {
    let ctx = RequestContext::from_headers(&headers);

    let Some(email) = non_empty(input.email) else {
        return Err(CoreError::Validation("Missing required fields".into()).into());
    };

    if let Some(user) = UserRepo::find_by_email(&state.pool, &email).await? {
        audit::record(
            &state,
            ActivityType::PasswordResetRequested,
            Some(user.id),
            &ctx,
            json!({ "email": email }),
        )
        .await;
    }

    Ok(Json(json!({
        "message": "If an account exists, a reset email has been sent"
    })))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn invalid_credentials() -> AppError {
    AppError::Core(CoreError::Unauthorized("Invalid credentials".into()))
}

fn user_exists() -> AppError {
    AppError::Core(CoreError::Conflict("User already exists".into()))
}

/// Extract the token from an `Authorization: Bearer <token>` header.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
}

/// Read one cookie value from the `Cookie` header.
fn cookie_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get("cookie")
        .and_then(|v| v.to_str().ok())?
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value)
}

/// Build a hardened auth cookie.
fn auth_cookie(name: &str, value: &str, secure: bool) -> String {
    let mut cookie =
        format!("{name}={value}; HttpOnly; SameSite=Strict; Path=/; Max-Age={COOKIE_MAX_AGE_SECS}");
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Build an expired cookie that clears `name` on the client.
fn clear_cookie(name: &str) -> String {
    format!("{name}=; HttpOnly; SameSite=Strict; Path=/; Max-Age=0")
}

fn append_cookie(response: &mut Response, cookie: &str) -> Result<(), AppError> {
    let value = HeaderValue::from_str(cookie)
        .map_err(|e| AppError::InternalError(format!("Invalid cookie header: {e}")))?;
    response.headers_mut().append(SET_COOKIE, value);
    Ok(())
}

/// 200 response carrying the token/session pair, the sanitized user, and
/// both auth cookies.
fn auth_success_response(
    state: &AppState,
    user: &User,
    issued: IssuedToken,
) -> AppResult<Response> {
    let secure = state.config.environment.is_production();
    let token_cookie = auth_cookie("authToken", &issued.token, secure);
    let session_cookie = auth_cookie("sessionId", &issued.session_id.to_string(), secure);

    let body = AuthResponse {
        token: issued.token,
        session_id: issued.session_id,
        user: UserResponse::from(user),
    };

    let mut response = Json(body).into_response();
    append_cookie(&mut response, &token_cookie)?;
    append_cookie(&mut response, &session_cookie)?;
    Ok(response)
}
