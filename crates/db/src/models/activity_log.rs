//! Activity log entity model and DTOs.
//!
//! Audit records are append-only: there is no update DTO and no
//! `updated_at` column.

use gatehouse_core::types::{Id, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A single audit record. Immutable once created.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ActivityLog {
    pub id: Id,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub activity_type: String,
    pub user_id: Option<Id>,
    pub ip_address: String,
    pub user_agent: String,
    pub details: serde_json::Value,
    pub metadata: Option<serde_json::Value>,
    pub timestamp: Timestamp,
}

/// DTO for appending a new audit record.
#[derive(Debug, Clone)]
pub struct CreateActivityLog {
    pub activity_type: String,
    pub user_id: Option<Id>,
    pub ip_address: String,
    pub user_agent: String,
    pub details: serde_json::Value,
    pub metadata: Option<serde_json::Value>,
}

/// Filter parameters for querying the audit trail.
#[derive(Debug, Clone, Default)]
pub struct ActivityLogQuery {
    pub user_id: Option<Id>,
    pub activity_type: Option<String>,
    pub start: Option<Timestamp>,
    pub end: Option<Timestamp>,
}
