//! Audit trail event types.

use serde::{Deserialize, Serialize};

/// The kind of security-relevant event recorded in the audit trail.
///
/// Stored in the `activity_logs.type` column as the SCREAMING_SNAKE name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivityType {
    AuthLogin,
    AuthLogout,
    AuthFailedAttempt,
    UserCreated,
    UserUpdated,
    RoleChanged,
    PasswordResetRequested,
    PasswordChanged,
    AdminAction,
}

impl ActivityType {
    pub fn as_str(self) -> &'static str {
        match self {
            ActivityType::AuthLogin => "AUTH_LOGIN",
            ActivityType::AuthLogout => "AUTH_LOGOUT",
            ActivityType::AuthFailedAttempt => "AUTH_FAILED_ATTEMPT",
            ActivityType::UserCreated => "USER_CREATED",
            ActivityType::UserUpdated => "USER_UPDATED",
            ActivityType::RoleChanged => "ROLE_CHANGED",
            ActivityType::PasswordResetRequested => "PASSWORD_RESET_REQUESTED",
            ActivityType::PasswordChanged => "PASSWORD_CHANGED",
            ActivityType::AdminAction => "ADMIN_ACTION",
        }
    }
}

impl std::fmt::Display for ActivityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_names_match_stored_names() {
        let json = serde_json::to_value(ActivityType::AuthFailedAttempt).unwrap();
        assert_eq!(json, "AUTH_FAILED_ATTEMPT");
        assert_eq!(
            ActivityType::AuthFailedAttempt.as_str(),
            "AUTH_FAILED_ATTEMPT"
        );
    }
}
