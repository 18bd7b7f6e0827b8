//! Request-pipeline middleware.
//!
//! - [`sanitize`] -- HTML-escapes string leaves of JSON bodies and query values.
//! - [`headers`] -- injects the fixed security response headers.
//! - [`rate_limit`] -- fixed-window per-client counters by route class.
//! - [`auth::AuthUser`] -- extracts the authenticated user from a Bearer
//!   token, requiring the live-session pairing.
//! - [`permission`] -- permission-gate extractors wrapping [`auth::AuthUser`].

pub mod auth;
pub mod headers;
pub mod permission;
pub mod rate_limit;
pub mod sanitize;
