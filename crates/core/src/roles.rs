//! Static role/permission model.
//!
//! Roles form a strict hierarchy: every permission granted to `User` is also
//! granted to `Moderator`, and every `Moderator` permission is granted to
//! `Admin`. The mapping is a compile-time table; [`has_permission`] is a pure,
//! total function and never fails.

use serde::{Deserialize, Serialize};

/// A user's role, stored in the `users.role` column as its SCREAMING_SNAKE name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    User,
    Moderator,
    Admin,
}

/// A single grantable capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Permission {
    ReadPosts,
    CreatePosts,
    EditPosts,
    DeletePosts,
    ManageUsers,
    ManageRoles,
}

impl Role {
    /// The database/API representation of this role.
    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "USER",
            Role::Moderator => "MODERATOR",
            Role::Admin => "ADMIN",
        }
    }

    /// Parse a stored role name. Returns `None` for anything unrecognized.
    pub fn from_name(name: &str) -> Option<Role> {
        match name {
            "USER" => Some(Role::User),
            "MODERATOR" => Some(Role::Moderator),
            "ADMIN" => Some(Role::Admin),
            _ => None,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Permissions granted to each role.
pub fn permissions_for(role: Role) -> &'static [Permission] {
    match role {
        Role::User => &[Permission::ReadPosts, Permission::CreatePosts],
        Role::Moderator => &[
            Permission::ReadPosts,
            Permission::CreatePosts,
            Permission::EditPosts,
            Permission::DeletePosts,
        ],
        Role::Admin => &[
            Permission::ReadPosts,
            Permission::CreatePosts,
            Permission::EditPosts,
            Permission::DeletePosts,
            Permission::ManageUsers,
            Permission::ManageRoles,
        ],
    }
}

/// Whether `role` grants `permission`.
pub fn has_permission(role: Role, permission: Permission) -> bool {
    permissions_for(role).contains(&permission)
}

/// Whether the role named `name` grants `permission`.
///
/// Total over arbitrary strings: an unknown role name grants nothing.
pub fn role_has_permission(name: &str, permission: Permission) -> bool {
    Role::from_name(name).is_some_and(|role| has_permission(role, permission))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_permissions() {
        assert!(has_permission(Role::User, Permission::ReadPosts));
        assert!(has_permission(Role::User, Permission::CreatePosts));
        assert!(!has_permission(Role::User, Permission::EditPosts));
        assert!(!has_permission(Role::User, Permission::ManageUsers));
    }

    #[test]
    fn test_admin_permissions() {
        assert!(has_permission(Role::Admin, Permission::ManageUsers));
        assert!(has_permission(Role::Admin, Permission::ManageRoles));
    }

    /// Every permission granted to a role is also granted to the next role up.
    #[test]
    fn test_permissions_are_monotonic() {
        for p in permissions_for(Role::User) {
            assert!(
                has_permission(Role::Moderator, *p),
                "moderator must inherit {p:?}"
            );
        }
        for p in permissions_for(Role::Moderator) {
            assert!(has_permission(Role::Admin, *p), "admin must inherit {p:?}");
        }
    }

    #[test]
    fn test_unknown_role_grants_nothing() {
        assert!(Role::from_name("SUPERUSER").is_none());
        assert!(!role_has_permission("SUPERUSER", Permission::ReadPosts));
        assert!(!role_has_permission("", Permission::ReadPosts));
        // Stored names are case-sensitive.
        assert!(!role_has_permission("admin", Permission::ManageUsers));
    }

    #[test]
    fn test_role_round_trip() {
        for role in [Role::User, Role::Moderator, Role::Admin] {
            assert_eq!(Role::from_name(role.as_str()), Some(role));
        }
    }
}
