//! The token service: pairs signed tokens with server-side sessions.
//!
//! A signature alone is not enough to act on a token. Every issued token is
//! persisted on a session row, and the authoritative check
//! ([`verify_with_session`]) requires a live session whose stored token
//! equals the presented one -- so a leaked token stops working the moment
//! its session is invalidated, regardless of its remaining cryptographic
//! lifetime.

use gatehouse_core::types::Id;
use gatehouse_db::repositories::SessionRepo;
use gatehouse_db::DbPool;

use crate::auth::jwt::{self, JwtConfig};
use crate::error::{AppError, AppResult};

/// A freshly issued token/session pair.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub session_id: Id,
}

/// Sign a 24h token for `user_id` and create the session carrying it.
pub async fn issue(pool: &DbPool, config: &JwtConfig, user_id: Id) -> AppResult<IssuedToken> {
    let token = jwt::generate_token(user_id, config)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    let session = SessionRepo::create(pool, user_id, &token).await?;

    Ok(IssuedToken {
        token,
        session_id: session.id,
    })
}

/// The authoritative check used by protected routes.
///
/// Fails closed: `false` when the session is missing or expired, when its
/// stored token differs from the presented one, and when the signature or
/// expiry check fails. Both the session pairing and the cryptographic check
/// must pass.
pub async fn verify_with_session(
    pool: &DbPool,
    config: &JwtConfig,
    token: &str,
    session_id: Id,
) -> Result<bool, sqlx::Error> {
    let Some(session) = SessionRepo::get(pool, session_id).await? else {
        return Ok(false);
    };
    if session.token != token {
        return Ok(false);
    }
    Ok(jwt::validate_token(token, config).is_ok())
}

/// Rotate: invalidate the old session and issue a fresh token/session pair.
///
/// Rotation rather than update-in-place -- a stolen token observed before
/// the rotation is useless against the old session afterwards.
pub async fn refresh(
    pool: &DbPool,
    config: &JwtConfig,
    user_id: Id,
    old_session_id: Id,
) -> AppResult<IssuedToken> {
    SessionRepo::invalidate(pool, old_session_id).await?;
    issue(pool, config, user_id).await
}
