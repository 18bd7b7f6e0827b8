//! Authentication primitives and the token service.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`jwt`] -- HS256 token signing and validation (pure computation).
//! - [`token`] -- the token service pairing signed tokens with server-side
//!   sessions: issuance, the authoritative session-paired check, rotation.

pub mod jwt;
pub mod password;
pub mod token;
