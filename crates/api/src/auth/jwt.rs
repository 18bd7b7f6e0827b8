//! HS256 token signing and validation.
//!
//! A token is a signed, stateless assertion of `{sub, iat, exp}`. Signature
//! and expiry checks here are purely cryptographic -- they never consult the
//! session store. Protected routes must use the session-paired check in
//! [`crate::auth::token`] instead of trusting a signature alone.

use gatehouse_core::types::Id;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Claims embedded in every token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject -- the user's id.
    pub sub: Id,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    /// Unique token id. Two tokens minted for the same user in the same
    /// second must still differ, or their session pairings collide.
    pub jti: Id,
}

/// Configuration for token generation and validation.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC-SHA256 secret used to sign and verify tokens.
    pub secret: String,
    /// Token lifetime in hours (default: 24, matching the session TTL).
    pub token_expiry_hours: i64,
}

/// Default token expiry in hours.
const DEFAULT_EXPIRY_HOURS: i64 = 24;

/// Signing secret tolerated only outside production.
const DEV_SECRET: &str = "gatehouse-dev-secret-do-not-use-in-production";

impl JwtConfig {
    /// Load token configuration from environment variables.
    ///
    /// | Env Var            | Required          | Default |
    /// |--------------------|-------------------|---------|
    /// | `JWT_SECRET`       | in production     | dev-only fallback |
    /// | `JWT_EXPIRY_HOURS` | no                | `24`    |
    ///
    /// # Panics
    ///
    /// Panics if `production` is set and `JWT_SECRET` is missing or empty.
    pub fn from_env(production: bool) -> Self {
        let secret = match std::env::var("JWT_SECRET") {
            Ok(s) if !s.is_empty() => s,
            _ if production => panic!("JWT_SECRET must be set in production"),
            _ => {
                tracing::warn!("JWT_SECRET not set, using development signing secret");
                DEV_SECRET.to_string()
            }
        };

        let token_expiry_hours: i64 = std::env::var("JWT_EXPIRY_HOURS")
            .unwrap_or_else(|_| DEFAULT_EXPIRY_HOURS.to_string())
            .parse()
            .expect("JWT_EXPIRY_HOURS must be a valid i64");

        Self {
            secret,
            token_expiry_hours,
        }
    }
}

/// Sign a token for the given user.
pub fn generate_token(user_id: Id, config: &JwtConfig) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: user_id,
        iat: now,
        exp: now + config.token_expiry_hours * 3600,
        jti: uuid::Uuid::new_v4(),
    };

    encode(
        &Header::default(), // HS256
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Validate signature and expiry, returning the embedded [`Claims`].
pub fn validate_token(
    token: &str,
    config: &JwtConfig,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &Validation::default(), // HS256, validates exp
    )?;
    Ok(token_data.claims)
}
