//! Database row structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` entity struct matching the database row
//! - Create DTOs and response projections where the entity carries
//!   fields that must not cross the API boundary

pub mod activity_log;
pub mod session;
pub mod user;
