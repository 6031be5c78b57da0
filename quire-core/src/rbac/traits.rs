//! Core traits for RBAC system

use super::authz::has_permission;
use super::context::Actor;
use super::permissions::Permission;

/// Capability questions asked while rendering
///
/// Implementors that are still resolving the actor answer `false` to every
/// check and `true` to [`CapabilityQuery::is_loading`].
pub trait CapabilityQuery {
    fn has_permission(&self, permission: Permission) -> bool;

    fn can_access_admin(&self) -> bool {
        self.has_permission(Permission::AdminAccess)
    }

    fn is_loading(&self) -> bool;
}

impl CapabilityQuery for Option<Actor> {
    fn has_permission(&self, permission: Permission) -> bool {
        has_permission(self.as_ref(), permission)
    }

    fn is_loading(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rbac::Role;

    #[test]
    fn test_option_actor_capability_query() {
        let signed_in = Some(Actor::new("u", "User", Some(Role::User)));
        assert!(CapabilityQuery::has_permission(&signed_in, Permission::DeleteOwnContent));
        assert!(!signed_in.can_access_admin());

        let signed_out: Option<Actor> = None;
        assert!(!CapabilityQuery::has_permission(&signed_out, Permission::DeleteOwnContent));
        assert!(!signed_out.is_loading());
    }
}
