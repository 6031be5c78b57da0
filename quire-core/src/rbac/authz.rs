//! Authorization queries
//!
//! Pure functions over an optional actor. Nothing is cached between calls.

use super::context::Actor;
use super::permissions::Permission;
use super::roles::{permissions_for, Role};

/// Whether `actor` holds `permission`
///
/// An absent actor holds nothing. Administrators short-circuit to `true`.
pub fn has_permission(actor: Option<&Actor>, permission: Permission) -> bool {
    match actor {
        None => false,
        Some(actor) if actor.is_admin() => true,
        Some(actor) => permissions_for(actor.role).contains(permission),
    }
}

/// Whether `actor` may enter the administration area
pub fn can_access_admin(actor: Option<&Actor>) -> bool {
    has_permission(actor, Permission::AdminAccess)
}

/// Check a role name against a permission identifier
///
/// Both inputs are parsed strictly; an unknown name is an error rather than a
/// `false` so callers can tell a typo from a denial.
pub fn role_allows(role: &str, permission: &str) -> crate::Result<bool> {
    let role: Role = role.parse()?;
    let permission: Permission = permission.parse()?;
    Ok(has_permission(Some(&Actor::new("check", "check", Some(role))), permission))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rbac::Role;

    #[test]
    fn test_anonymous_has_nothing() {
        for p in Permission::ALL {
            assert!(!has_permission(None, *p));
        }
        assert!(!can_access_admin(None));
    }

    #[test]
    fn test_admin_has_everything() {
        let admin = Actor::new("a", "Admin", Some(Role::Admin));
        for p in Permission::ALL {
            assert!(has_permission(Some(&admin), *p));
        }
        assert!(can_access_admin(Some(&admin)));
    }

    #[test]
    fn test_editor_cannot_enter_admin() {
        let editor = Actor::new("e", "Editor", Some(Role::Editor));
        assert!(has_permission(Some(&editor), Permission::PublishContent));
        assert!(!can_access_admin(Some(&editor)));
    }

    #[test]
    fn test_queries_are_idempotent() {
        let user = Actor::new("u", "User", Some(Role::User));
        let first = has_permission(Some(&user), Permission::EditOwnContent);
        let second = has_permission(Some(&user), Permission::EditOwnContent);
        assert!(first && second);
    }

    #[test]
    fn test_role_allows_parses_names() {
        assert!(role_allows("editor", "content:publish").unwrap());
        assert!(!role_allows("User", "system:admin_access").unwrap());
        assert!(matches!(role_allows("owner", "content:publish"), Err(crate::QuireError::UnknownRole(_))));
        assert!(matches!(role_allows("admin", "content:fly"), Err(crate::QuireError::UnknownPermission(_))));
    }
}
