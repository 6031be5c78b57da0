//! Authenticated actor

use super::permissions::{Permission, PermissionSet};
use super::roles::{permissions_for, Role};
use serde::Serialize;

/// The authenticated principal for one request or one client session
///
/// Flags are computed once at construction. An actor is never mutated; a
/// re-authentication produces a new value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Actor {
    pub id: String,
    pub display_name: String,
    pub role: Option<Role>,
    is_admin: bool,
    is_editor_or_above: bool,
}

impl Actor {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>, role: Option<Role>) -> Self {
        let is_admin = role == Some(Role::Admin);
        let is_editor_or_above = matches!(role, Some(Role::Editor | Role::Admin));
        Self { id: id.into(), display_name: display_name.into(), role, is_admin, is_editor_or_above }
    }

    /// Actor whose identity is verified but who has no profile record
    pub fn roleless(id: impl Into<String>) -> Self {
        let id = id.into();
        Self::new(id.clone(), id, None)
    }

    pub fn is_admin(&self) -> bool {
        self.is_admin
    }

    pub fn is_editor_or_above(&self) -> bool {
        self.is_editor_or_above
    }

    pub fn permissions(&self) -> PermissionSet {
        permissions_for(self.role)
    }

    pub fn has_permission(&self, permission: Permission) -> bool {
        super::authz::has_permission(Some(self), permission)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_follow_role() {
        let admin = Actor::new("a1", "Ada", Some(Role::Admin));
        assert!(admin.is_admin() && admin.is_editor_or_above());

        let editor = Actor::new("e1", "Eve", Some(Role::Editor));
        assert!(!editor.is_admin() && editor.is_editor_or_above());

        let user = Actor::new("u1", "Uma", Some(Role::User));
        assert!(!user.is_admin() && !user.is_editor_or_above());

        let roleless = Actor::roleless("r1");
        assert!(!roleless.is_admin() && !roleless.is_editor_or_above());
    }

    #[test]
    fn test_roleless_actor_has_nothing() {
        let actor = Actor::roleless("ghost");
        assert_eq!(actor.display_name, "ghost");
        assert!(actor.permissions().is_empty());
        assert!(!actor.has_permission(Permission::EditOwnContent));
    }
}
