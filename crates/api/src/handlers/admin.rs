//! Handlers for the `/api/admin` resource. Every route here sits behind a
//! permission-gate extractor.

use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::Json;
use gatehouse_core::activity::ActivityType;
use gatehouse_core::error::CoreError;
use gatehouse_core::roles::Role;
use gatehouse_core::types::{Id, Timestamp};
use gatehouse_db::models::activity_log::{ActivityLog, ActivityLogQuery};
use gatehouse_db::models::user::UserResponse;
use gatehouse_db::repositories::{ActivityLogRepo, UserRepo};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::audit::{self, RequestContext};
use crate::error::AppResult;
use crate::middleware::permission::{RequireManageRoles, RequireManageUsers};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Query parameters for `GET /api/admin/logs`. All filters are optional and
/// arrive as strings; parsing failures are a 400.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogsParams {
    pub user_id: Option<String>,
    #[serde(rename = "type")]
    pub activity_type: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LogsResponse {
    pub logs: Vec<ActivityLog>,
}

/// Request body for `PUT /api/admin/users/:id/role`.
#[derive(Debug, Deserialize)]
pub struct UpdateRoleRequest {
    pub role: Option<String>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/admin/logs
///
/// Filtered audit-trail query, newest first. Requires `MANAGE_USERS`.
pub async fn get_logs(
    RequireManageUsers(_user): RequireManageUsers,
    State(state): State<AppState>,
    Query(params): Query<LogsParams>,
) -> AppResult<Json<LogsResponse>> {
    let filters = ActivityLogQuery {
        user_id: parse_filter(params.user_id, "userId", |v| v.parse::<Id>().ok())?,
        activity_type: params.activity_type,
        start: parse_filter(params.start_date, "startDate", parse_timestamp)?,
        end: parse_filter(params.end_date, "endDate", parse_timestamp)?,
    };

    let logs = ActivityLogRepo::query(&state.pool, &filters).await?;
    Ok(Json(LogsResponse { logs }))
}

/// PUT /api/admin/users/:id/role
///
/// Change a user's role to one of the known role names. Requires
/// `MANAGE_ROLES`.
pub async fn update_role(
    RequireManageRoles(actor): RequireManageRoles,
    State(state): State<AppState>,
    Path(user_id): Path<Id>,
    headers: HeaderMap,
    Json(input): Json<UpdateRoleRequest>,
) -> AppResult<Json<UserResponse>> {
    let ctx = RequestContext::from_headers(&headers);

    let role = input
        .role
        .as_deref()
        .and_then(Role::from_name)
        .ok_or(CoreError::Validation("Invalid role".into()))?;

    let target = UserRepo::find_by_id(&state.pool, user_id)
        .await?
        .ok_or(CoreError::NotFound("User"))?;

    let updated = UserRepo::update_role(&state.pool, user_id, role.as_str())
        .await?
        .ok_or(CoreError::NotFound("User"))?;

    audit::record(
        &state,
        ActivityType::RoleChanged,
        Some(actor.user_id),
        &ctx,
        json!({
            "targetUserId": user_id,
            "oldRole": target.role,
            "newRole": role.as_str(),
        }),
    )
    .await;

    Ok(Json(UserResponse::from(&updated)))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Run `parse` over an optional string filter, turning a parse failure into
/// a validation error naming the parameter.
fn parse_filter<T>(
    value: Option<String>,
    param: &str,
    parse: impl Fn(&str) -> Option<T>,
) -> Result<Option<T>, CoreError> {
    match value {
        None => Ok(None),
        Some(raw) => parse(&raw)
            .map(Some)
            .ok_or_else(|| CoreError::Validation(format!("Invalid {param} parameter"))),
    }
}

fn parse_timestamp(raw: &str) -> Option<Timestamp> {
    chrono::DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&chrono::Utc))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_timestamp_accepts_rfc3339() {
        assert!(parse_timestamp("2026-01-15T10:00:00Z").is_some());
        assert!(parse_timestamp("2026-01-15T10:00:00+02:00").is_some());
        assert!(parse_timestamp("not-a-date").is_none());
    }

    #[test]
    fn test_parse_filter_reports_parameter_name() {
        let err = parse_filter(Some("nope".into()), "startDate", parse_timestamp)
            .err()
            .map(|e| e.to_string());
        assert_eq!(err.as_deref(), Some("Invalid startDate parameter"));
    }
}
