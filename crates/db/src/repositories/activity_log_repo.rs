//! Repository for the `activity_logs` table.
//!
//! Append and query only; audit records are never updated or deleted here.

use sqlx::{PgPool, QueryBuilder};
use uuid::Uuid;

use crate::models::activity_log::{ActivityLog, ActivityLogQuery, CreateActivityLog};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, type, user_id, ip_address, user_agent, details, metadata, timestamp";

/// Provides append and query operations for the audit trail.
pub struct ActivityLogRepo;

impl ActivityLogRepo {
    /// Append one audit record, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateActivityLog,
    ) -> Result<ActivityLog, sqlx::Error> {
        let query = format!(
            "INSERT INTO activity_logs (id, type, user_id, ip_address, user_agent, details, metadata)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ActivityLog>(&query)
            .bind(Uuid::new_v4())
            .bind(&input.activity_type)
            .bind(input.user_id)
            .bind(&input.ip_address)
            .bind(&input.user_agent)
            .bind(&input.details)
            .bind(&input.metadata)
            .fetch_one(pool)
            .await
    }

    /// Query audit records matching the given filters, newest first.
    pub async fn query(
        pool: &PgPool,
        filters: &ActivityLogQuery,
    ) -> Result<Vec<ActivityLog>, sqlx::Error> {
        let mut builder = QueryBuilder::new(format!(
            "SELECT {COLUMNS} FROM activity_logs WHERE 1=1"
        ));

        if let Some(user_id) = filters.user_id {
            builder.push(" AND user_id = ").push_bind(user_id);
        }
        if let Some(activity_type) = &filters.activity_type {
            builder.push(" AND type = ").push_bind(activity_type);
        }
        if let Some(start) = filters.start {
            builder.push(" AND timestamp >= ").push_bind(start);
        }
        if let Some(end) = filters.end {
            builder.push(" AND timestamp <= ").push_bind(end);
        }

        builder.push(" ORDER BY timestamp DESC");

        builder
            .build_query_as::<ActivityLog>()
            .fetch_all(pool)
            .await
    }
}
