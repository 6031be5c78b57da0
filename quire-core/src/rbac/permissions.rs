//! Permission catalog for RBAC
//!
//! The catalog is closed: every capability the platform knows about is a
//! variant of [`Permission`]. Adding one is a code change, and the
//! administrator role picks it up automatically because its set is built by
//! enumerating [`Permission::ALL`].

use quire_macros::PermissionCatalog;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Area of the platform a permission belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    /// Posts and collections
    Content,
    /// Comment moderation
    Moderation,
    /// Accounts and role assignment
    UserManagement,
    /// Site-wide settings
    Settings,
    /// The administration surface itself
    System,
}

impl Domain {
    pub const ALL: &'static [Domain] =
        &[Domain::Content, Domain::Moderation, Domain::UserManagement, Domain::Settings, Domain::System];

    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::Content => "content",
            Domain::Moderation => "moderation",
            Domain::UserManagement => "user_management",
            Domain::Settings => "settings",
            Domain::System => "system",
        }
    }
}

/// A named capability
///
/// Permissions suffixed `Own` are capabilities only: they say the actor may
/// act on content *provided the caller has verified ownership of the row*.
/// See [`crate::rbac::ownership`] for the composed check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, PermissionCatalog)]
#[domain_type(Domain)]
pub enum Permission {
    /// Write new posts and collections
    #[permission(id = "content:create", domain = Content)]
    CreateContent,

    /// Edit content the actor owns
    #[permission(id = "content:edit_own", domain = Content)]
    EditOwnContent,

    /// Delete content the actor owns
    #[permission(id = "content:delete_own", domain = Content)]
    DeleteOwnContent,

    /// Edit anyone's content
    #[permission(id = "content:edit_any", domain = Content)]
    EditAnyContent,

    /// Delete anyone's content
    #[permission(id = "content:delete_any", domain = Content)]
    DeleteAnyContent,

    /// Publish drafts
    #[permission(id = "content:publish", domain = Content)]
    PublishContent,

    /// Approve, hide and flag comments
    #[permission(id = "moderation:comments", domain = Moderation)]
    ModerateComments,

    /// Permanently remove any comment
    #[permission(id = "moderation:delete_comment", domain = Moderation)]
    DeleteAnyComment,

    /// List user accounts
    #[permission(id = "users:view", domain = UserManagement)]
    ViewUsers,

    /// Suspend, restore and edit user accounts
    #[permission(id = "users:manage", domain = UserManagement)]
    ManageUsers,

    /// Change another actor's role
    #[permission(id = "users:assign_roles", domain = UserManagement)]
    AssignRoles,

    /// Change site-wide settings
    #[permission(id = "settings:manage", domain = Settings)]
    ManageSettings,

    /// Enter the administration area
    #[permission(id = "system:admin_access", domain = System)]
    AdminAccess,

    /// Read the security audit log
    #[permission(id = "system:audit_log", domain = System)]
    ViewAuditLog,
}

impl Permission {
    /// Bit used for this permission inside a [`PermissionSet`]
    pub const fn bit(&self) -> u64 {
        1u64 << self.index()
    }

    /// Every permission in a domain, in catalog order
    pub fn in_domain(domain: Domain) -> impl Iterator<Item = Permission> {
        Self::ALL.iter().copied().filter(move |p| p.domain() == domain)
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.identifier())
    }
}

/// Returned when text does not name a catalog permission
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown permission `{0}`")]
pub struct UnknownPermission(pub String);

impl FromStr for Permission {
    type Err = UnknownPermission;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Permission::from_identifier(s.trim()).ok_or_else(|| UnknownPermission(s.to_string()))
    }
}

impl Serialize for Permission {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.identifier())
    }
}

impl<'de> Deserialize<'de> for Permission {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Immutable set of permissions
///
/// Stored as a bitset over catalog indexes, so membership is a single AND.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PermissionSet {
    bits: u64,
}

impl PermissionSet {
    /// The empty set (anonymous or roleless actors)
    pub const fn empty() -> Self {
        Self { bits: 0 }
    }

    /// Every permission in the catalog
    pub fn all() -> Self {
        Self::from_slice(Permission::ALL)
    }

    /// Build a set from a list of permissions
    pub const fn from_slice(permissions: &[Permission]) -> Self {
        let mut bits = 0u64;
        let mut i = 0;
        while i < permissions.len() {
            bits |= permissions[i].bit();
            i += 1;
        }
        Self { bits }
    }

    pub const fn contains(&self, permission: Permission) -> bool {
        self.bits & permission.bit() != 0
    }

    /// True if every permission in `other` is also in `self`
    pub const fn is_superset(&self, other: &PermissionSet) -> bool {
        self.bits & other.bits == other.bits
    }

    pub const fn union(&self, other: &PermissionSet) -> Self {
        Self { bits: self.bits | other.bits }
    }

    /// Permissions in `self` that are not in `other`
    pub const fn difference(&self, other: &PermissionSet) -> Self {
        Self { bits: self.bits & !other.bits }
    }

    pub const fn len(&self) -> usize {
        self.bits.count_ones() as usize
    }

    pub const fn is_empty(&self) -> bool {
        self.bits == 0
    }

    /// Iterate in catalog order
    pub fn iter(&self) -> impl Iterator<Item = Permission> + '_ {
        Permission::ALL.iter().copied().filter(move |p| self.contains(*p))
    }

    /// Identifiers of every member, in catalog order
    pub fn identifiers(&self) -> Vec<&'static str> {
        self.iter().map(|p| p.identifier()).collect()
    }
}

impl FromIterator<Permission> for PermissionSet {
    fn from_iter<I: IntoIterator<Item = Permission>>(iter: I) -> Self {
        let bits = iter.into_iter().fold(0u64, |acc, p| acc | p.bit());
        Self { bits }
    }
}

impl fmt::Debug for PermissionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter().map(|p| p.identifier())).finish()
    }
}

impl Serialize for PermissionSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}
