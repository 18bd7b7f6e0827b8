//! Session entity model.

use gatehouse_core::types::{Id, Timestamp};
use sqlx::FromRow;

/// A session row from the `sessions` table.
///
/// A session is valid iff `now < expires_at` and the row still exists.
/// The stored `token` must match the presented bearer token for the pairing
/// check; the session id alone proves nothing.
#[derive(Debug, Clone, FromRow)]
pub struct Session {
    pub id: Id,
    pub user_id: Id,
    pub token: String,
    pub created_at: Timestamp,
    pub expires_at: Timestamp,
    pub last_active: Timestamp,
}
