//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod activity_log_repo;
pub mod session_repo;
pub mod user_repo;

pub use activity_log_repo::ActivityLogRepo;
pub use session_repo::SessionRepo;
pub use user_repo::UserRepo;
