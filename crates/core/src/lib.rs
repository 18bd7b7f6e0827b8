//! Domain types shared by the database and API layers.
//!
//! - [`error`] -- the service-wide error taxonomy.
//! - [`roles`] -- static role/permission model.
//! - [`activity`] -- audit trail event types.
//! - [`sanitize`] -- HTML-escaping of untrusted input.

pub mod activity;
pub mod error;
pub mod roles;
pub mod sanitize;
pub mod types;
