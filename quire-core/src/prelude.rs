//! Prelude module for convenient imports.
//!
//! ```rust,ignore
//! use quire_core::prelude::*;
//! ```

// === Derive macro (from quire-macros) ===
pub use crate::PermissionCatalog;

// === Server ===
pub use crate::http::{GuardDecision, QuireApp, QuireServer, RouteGuard};

// === Configuration and logging ===
pub use crate::config::{QuireConfig, UserSeed};
pub use crate::logging::init_logging;

// === Authorization ===
pub use crate::rbac::{
    authorize_owned, can_access_admin, has_permission, permissions_for, Action, Actor, CapabilityQuery, Domain,
    Permission, PermissionSet, Role,
};

// === Sessions ===
pub use crate::session::{
    CredentialSigner, MemoryProfileStore, MemorySessionStore, Profile, ProfileStore, Resolution, SessionManager,
    SessionResolver, SessionStore, VerificationError,
};

// === Rendering ===
pub use crate::render::{AuthProvider, AuthState, Gate, GateState, Requirement};

// === Errors ===
pub use crate::QuireError;
