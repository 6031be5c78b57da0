//! Quire - Core
//!
//! Capability-based access control for a server-rendered blog platform.
//!
//! # Overview
//!
//! Quire answers one question everywhere: *may this actor do this?* A closed
//! catalog of permissions is granted through a fixed role hierarchy, and two
//! guard points enforce the answer:
//!
//! - the **request guard** runs before protected handlers and redirects
//!   anyone who may not enter the admin area
//! - **render gates** decide which fragments of a page are shown
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use quire_core::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = QuireConfig::load()?;
//!     init_logging(&config.logging)?;
//!     QuireServer::from_config(config).serve().await
//! }
//! ```
//!
//! # Architecture
//!
//! - [`rbac`] - permission catalog, role resolver and authorization queries
//! - [`session`] - signed credentials, session and profile stores, resolution
//! - [`http`] - hyper server, route guard, sign-in handlers and pages
//! - [`render`] - render gates and the published auth state
//! - [`config`] - TOML + environment configuration
//! - [`logging`] - `log` facade backend
//! - [`security`] - Argon2 password hashing

pub mod config; // Configuration system with TOML support
pub mod http;
pub mod logging; // Standard log crate backend
pub mod rbac; // Capability catalog and role hierarchy
pub mod render;
pub mod security; // Password hashing
pub mod session; // Signed credentials and session resolution

// Prelude module for convenient imports
pub mod prelude;

// Re-export the derive so catalog users only need one crate
pub use quire_macros::PermissionCatalog;

// Re-exports of main types and traits
pub use http::{QuireApp, QuireServer};
pub use rbac::{has_permission, Actor, CapabilityQuery, Permission, PermissionSet, Role};

/// Main result type for the library
pub type Result<T> = std::result::Result<T, QuireError>;

/// Main error type for Quire
#[derive(Debug, thiserror::Error)]
pub enum QuireError {
    #[error(transparent)]
    UnknownPermission(#[from] rbac::UnknownPermission),

    #[error(transparent)]
    UnknownRole(#[from] rbac::UnknownRole),

    #[error("credential verification failed: {0}")]
    Verification(#[from] session::VerificationError),

    #[error(transparent)]
    Password(#[from] security::PasswordError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_errors_convert() {
        let err: QuireError = "content:nope".parse::<Permission>().unwrap_err().into();
        assert!(matches!(err, QuireError::UnknownPermission(_)));

        let err: QuireError = session::VerificationError::Expired.into();
        assert!(err.to_string().starts_with("credential verification failed"));
    }
}
