//! Repository for the `sessions` table.
//!
//! Expiry is lazy: an expired row is deleted the next time it is read, and
//! [`SessionRepo::sweep_expired`] bulk-deletes stragglers on a schedule.
//! Both paths only remove rows already past their validity window, so they
//! are safe to run concurrently with normal traffic.

use chrono::{Duration, Utc};
use gatehouse_core::types::Id;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::session::Session;

/// Session lifetime.
const SESSION_TTL_HOURS: i64 = 24;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, token, created_at, expires_at, last_active";

/// Provides lifecycle operations for sessions.
pub struct SessionRepo;

impl SessionRepo {
    /// Insert a new session for `user_id` carrying `token`, returning the
    /// created row. Expiry is 24 hours from now.
    ///
    /// There is no uniqueness constraint on `user_id`: two concurrent creates
    /// for the same user produce two independent sessions (multi-device
    /// sign-in).
    pub async fn create(pool: &PgPool, user_id: Id, token: &str) -> Result<Session, sqlx::Error> {
        let expires_at = Utc::now() + Duration::hours(SESSION_TTL_HOURS);
        let query = format!(
            "INSERT INTO sessions (id, user_id, token, expires_at)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Session>(&query)
            .bind(Uuid::new_v4())
            .bind(user_id)
            .bind(token)
            .bind(expires_at)
            .fetch_one(pool)
            .await
    }

    /// Fetch a session by id.
    ///
    /// Returns `None` if the row is absent or expired. An expired row is
    /// deleted on the spot; a valid hit refreshes `last_active`.
    pub async fn get(pool: &PgPool, id: Id) -> Result<Option<Session>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM sessions WHERE id = $1");
        let row = sqlx::query_as::<_, Session>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Self::resolve(pool, row).await
    }

    /// Fetch a session by its stored token value. Same validity contract as
    /// [`SessionRepo::get`].
    pub async fn get_by_token(pool: &PgPool, token: &str) -> Result<Option<Session>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM sessions WHERE token = $1");
        let row = sqlx::query_as::<_, Session>(&query)
            .bind(token)
            .fetch_optional(pool)
            .await?;
        Self::resolve(pool, row).await
    }

    /// Delete a session. Idempotent: deleting an absent session is not an
    /// error.
    pub async fn invalidate(pool: &PgPool, id: Id) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM sessions WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Bulk-delete every session past its expiry. Returns the count removed.
    pub async fn sweep_expired(pool: &PgPool) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= NOW()")
            .execute(pool)
            .await?;
        let removed = result.rows_affected();
        if removed > 0 {
            tracing::debug!(removed, "swept expired sessions");
        }
        Ok(removed)
    }

    /// Apply the validity contract to a fetched row: delete and drop expired
    /// rows, touch `last_active` on valid ones.
    async fn resolve(
        pool: &PgPool,
        row: Option<Session>,
    ) -> Result<Option<Session>, sqlx::Error> {
        let Some(session) = row else {
            return Ok(None);
        };

        if session.expires_at <= Utc::now() {
            Self::invalidate(pool, session.id).await?;
            return Ok(None);
        }

        sqlx::query("UPDATE sessions SET last_active = NOW() WHERE id = $1")
            .bind(session.id)
            .execute(pool)
            .await?;
        Ok(Some(session))
    }
}
