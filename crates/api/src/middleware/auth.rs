//! Bearer-token authentication extractor.
//!
//! Extraction performs the full authoritative check: the token's signature
//! and expiry must validate AND a live session must carry this exact token.
//! A revoked session therefore rejects a still-signed token.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use gatehouse_core::error::CoreError;
use gatehouse_core::types::Id;
use gatehouse_db::repositories::{SessionRepo, UserRepo};

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated user extracted from a Bearer token in the `Authorization`
/// header.
///
/// Use this as an extractor parameter in any handler that requires
/// authentication:
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = %user.user_id, role = %user.role, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The user's id (from `claims.sub`, cross-checked against the session).
    pub user_id: Id,
    /// The stored role name (e.g. `"ADMIN"`); evaluated through the
    /// permission table, never compared directly.
    pub role: String,
    /// The live session paired with the presented token.
    pub session_id: Id,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Missing Authorization header".into(),
                ))
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid Authorization format. Expected: Bearer <token>".into(),
            ))
        })?;

        // All failure modes below collapse to one message; the caller must
        // not learn whether the signature, the session, or the pairing failed.
        let rejection =
            || AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()));

        let claims = validate_token(token, &state.config.jwt).map_err(|_| rejection())?;

        let session = SessionRepo::get_by_token(&state.pool, token)
            .await?
            .ok_or_else(rejection)?;
        if session.user_id != claims.sub {
            return Err(rejection());
        }

        let user = UserRepo::find_by_id(&state.pool, claims.sub)
            .await?
            .ok_or_else(rejection)?;

        Ok(AuthUser {
            user_id: user.id,
            role: user.role,
            session_id: session.id,
        })
    }
}
