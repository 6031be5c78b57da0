//! Role management for RBAC
//!
//! Roles form a strict linear hierarchy `User ⊂ Editor ⊂ Admin`. The resolver
//! is an exhaustive match, so a new role cannot be added without deciding its
//! permissions here.

use super::permissions::{Permission, PermissionSet};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Role held by an actor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Ordinary signed-in member
    User,
    /// Trusted author and moderator
    Editor,
    /// Full control of the platform
    Admin,
}

const USER_PERMISSIONS: PermissionSet =
    PermissionSet::from_slice(&[Permission::EditOwnContent, Permission::DeleteOwnContent]);

const EDITOR_EXTRA: PermissionSet = PermissionSet::from_slice(&[
    Permission::CreateContent,
    Permission::EditAnyContent,
    Permission::PublishContent,
    Permission::ModerateComments,
]);

impl Role {
    /// Every role, lowest first
    pub const ALL: [Role; 3] = [Role::User, Role::Editor, Role::Admin];

    /// Value stored in the profile store
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Editor => "editor",
            Role::Admin => "admin",
        }
    }

    /// Parse a stored role value
    ///
    /// Anything that is not exactly a known role yields `None`, which resolves
    /// to the empty permission set. A typo in the store never grants access.
    pub fn from_stored(value: &str) -> Option<Role> {
        let role = Self::parse_stored(value);
        if role.is_none() {
            log::warn!("Unknown stored role '{}', treating actor as roleless", value);
        }
        role
    }

    /// Same exact match as [`from_stored`](Self::from_stored), without logging
    ///
    /// For display code that renders stored values on every request.
    pub fn parse_stored(value: &str) -> Option<Role> {
        match value {
            "user" => Some(Role::User),
            "editor" => Some(Role::Editor),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }

    pub fn permissions(&self) -> PermissionSet {
        permissions_for(Some(*self))
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when text does not name a role
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role `{0}` (expected user, editor or admin)")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    /// Strict parse for text boundaries (CLI, config) where a bad value is an error
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "user" => Ok(Role::User),
            "editor" => Ok(Role::Editor),
            "admin" => Ok(Role::Admin),
            _ => Err(UnknownRole(s.to_string())),
        }
    }
}

/// Resolve the permission set granted to a role
///
/// `None` (anonymous, roleless, or an unrecognized stored value) is the empty
/// set. The administrator set is enumerated from the catalog rather than
/// listed, so new permissions reach administrators automatically.
pub fn permissions_for(role: Option<Role>) -> PermissionSet {
    match role {
        None => PermissionSet::empty(),
        Some(Role::User) => USER_PERMISSIONS,
        Some(Role::Editor) => USER_PERMISSIONS.union(&EDITOR_EXTRA),
        Some(Role::Admin) => PermissionSet::all(),
    }
}
