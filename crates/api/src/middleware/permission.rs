//! Permission-gate extractors.
//!
//! Each extractor wraps [`AuthUser`] and rejects requests whose role does
//! not grant the required permission from the static table in
//! [`gatehouse_core::roles`]. 401 when unauthenticated, 403 when
//! authenticated but lacking the permission.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use gatehouse_core::error::CoreError;
use gatehouse_core::roles::{role_has_permission, Permission};

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Check one permission against an authenticated user's role.
fn require(user: &AuthUser, permission: Permission) -> Result<(), AppError> {
    if role_has_permission(&user.role, permission) {
        Ok(())
    } else {
        Err(AppError::Core(CoreError::Forbidden(
            "Insufficient permissions".into(),
        )))
    }
}

/// Requires the `MANAGE_USERS` permission (admin-only in the static table).
///
/// ```ignore
/// async fn admin_only(RequireManageUsers(user): RequireManageUsers) -> AppResult<Json<()>> {
///     // user's role grants MANAGE_USERS here
///     Ok(Json(()))
/// }
/// ```
pub struct RequireManageUsers(pub AuthUser);

impl FromRequestParts<AppState> for RequireManageUsers {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        require(&user, Permission::ManageUsers)?;
        Ok(RequireManageUsers(user))
    }
}

/// Requires the `MANAGE_ROLES` permission.
pub struct RequireManageRoles(pub AuthUser);

impl FromRequestParts<AppState> for RequireManageRoles {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        require(&user, Permission::ManageRoles)?;
        Ok(RequireManageRoles(user))
    }
}
