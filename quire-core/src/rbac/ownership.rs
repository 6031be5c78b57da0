//! Ownership-qualified authorization
//!
//! `EditOwnContent` and `DeleteOwnContent` are capabilities, not decisions:
//! they only mean something once the caller has compared the row's owner with
//! the actor. This module makes both layers visible at the call site.

use super::authz::has_permission;
use super::context::Actor;
use super::permissions::Permission;

/// Row-level action on a piece of content
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Edit,
    Delete,
}

impl Action {
    /// Permission that allows the action on any row
    pub fn any_permission(&self) -> Permission {
        match self {
            Action::Edit => Permission::EditAnyContent,
            Action::Delete => Permission::DeleteAnyContent,
        }
    }

    /// Permission that allows the action on the actor's own rows
    pub fn own_permission(&self) -> Permission {
        match self {
            Action::Edit => Permission::EditOwnContent,
            Action::Delete => Permission::DeleteOwnContent,
        }
    }
}

/// Decide an action on a row owned by `owner_id`
pub fn authorize_owned(actor: Option<&Actor>, action: Action, owner_id: &str) -> bool {
    if has_permission(actor, action.any_permission()) {
        return true;
    }

    match actor {
        Some(actor) => has_permission(Some(actor), action.own_permission()) && actor.id == owner_id,
        None => false,
    }
}
