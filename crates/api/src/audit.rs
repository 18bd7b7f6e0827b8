//! Activity logging for security-relevant events.
//!
//! Logging is strictly best-effort: a failed insert is reported through
//! tracing and swallowed. A successful sign-in must never turn into a 500
//! because the audit row did not land.

use axum::http::HeaderMap;
use gatehouse_core::activity::ActivityType;
use gatehouse_core::types::Id;
use gatehouse_db::models::activity_log::CreateActivityLog;
use gatehouse_db::repositories::ActivityLogRepo;
use serde_json::json;

use crate::middleware::rate_limit::client_key;
use crate::state::AppState;

/// Request context captured on every audit record.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub ip: String,
    pub user_agent: String,
}

impl RequestContext {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let user_agent = headers
            .get("user-agent")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("unknown")
            .to_string();
        RequestContext {
            ip: client_key(headers),
            user_agent,
        }
    }
}

/// Append one audit record. Never fails the caller.
pub async fn record(
    state: &AppState,
    activity_type: ActivityType,
    user_id: Option<Id>,
    ctx: &RequestContext,
    details: serde_json::Value,
) {
    let metadata = json!({
        "environment": state.config.environment.as_str(),
        "version": env!("CARGO_PKG_VERSION"),
    });

    let input = CreateActivityLog {
        activity_type: activity_type.as_str().to_string(),
        user_id,
        ip_address: ctx.ip.clone(),
        user_agent: ctx.user_agent.clone(),
        details,
        metadata: Some(metadata),
    };

    if let Err(err) = ActivityLogRepo::create(&state.pool, &input).await {
        tracing::warn!(%activity_type, error = %err, "failed to append activity log");
    }
}
