//! HTTP handlers.

pub mod admin;
pub mod auth;
