//! Quire RBAC (Role-Based Access Control) Module
//!
//! Capability-based authorization for the blog platform. A closed catalog of
//! permissions, a fixed role hierarchy that resolves to permission sets, and
//! pure query functions over an optional [`Actor`].
//!
//! # Features
//! - Compile-time catalog via `#[derive(PermissionCatalog)]`
//! - Exhaustive role resolver (`User ⊂ Editor ⊂ Admin`)
//! - Fail-closed queries: no actor, no role or unknown role means no permissions
//! - Ownership composition kept separate from capabilities
//!
//! # Example
//! ```rust,ignore
//! use quire_core::rbac::{has_permission, Actor, Permission, Role};
//!
//! let editor = Actor::new("u-42", "Eve", Some(Role::Editor));
//! assert!(has_permission(Some(&editor), Permission::PublishContent));
//! assert!(!has_permission(None, Permission::PublishContent));
//! ```

mod authz;
mod context;
pub mod ownership;
mod permissions;
mod roles;
mod traits;

// Public exports
pub use authz::{can_access_admin, has_permission, role_allows};
pub use context::Actor;
pub use ownership::{authorize_owned, Action};
pub use permissions::{Domain, Permission, PermissionSet, UnknownPermission};
pub use roles::{permissions_for, Role, UnknownRole};
pub use traits::CapabilityQuery;
