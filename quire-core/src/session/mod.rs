//! Session resolution for Quire
//!
//! Turns the credential a browser presents into an [`crate::rbac::Actor`]:
//! - HMAC-signed credentials carrying a session ID and identity
//! - Trait-based session storage, with an in-memory backend and background cleanup
//! - Read-only profile lookup that supplies the stored role
//! - Cookie handling with an optional Bearer fallback
//!
//! # Example
//!
//! ```no_run
//! use quire_core::session::{CredentialSigner, MemoryProfileStore, MemorySessionStore, SessionResolver};
//! use std::sync::Arc;
//!
//! # async fn example(cookie_value: Option<&str>) -> anyhow::Result<()> {
//! let resolver = SessionResolver::new(
//!     CredentialSigner::new("a-long-random-secret-from-config!!"),
//!     Arc::new(MemorySessionStore::new()),
//!     Arc::new(MemoryProfileStore::new()),
//! );
//! let resolution = resolver.resolve(cookie_value).await?;
//! # Ok(())
//! # }
//! ```

mod cookie;
mod error;
mod manager;
mod memory;
mod middleware;
mod profiles;
mod resolver;
mod signing;
mod store;

#[cfg(test)]
mod security_tests;

pub use cookie::{CookieConfig, SessionCookie};
pub use error::VerificationError;
pub use manager::{IssuedSession, SessionManager, SessionManagerConfig};
pub use memory::MemorySessionStore;
pub use middleware::CredentialExtractor;
pub use profiles::{MemoryProfileStore, Profile, ProfileStore};
pub use resolver::{Resolution, SessionResolver};
pub use signing::{Claims, CredentialSigner};
pub use store::{Session, SessionStore};

use std::fmt;
use std::str::FromStr;

/// SameSite cookie policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SameSitePolicy {
    /// Strict - cookie only sent to same site
    Strict,

    /// Lax - cookie sent on top-level navigation
    Lax,

    /// None - cookie sent on all requests (requires Secure)
    None,
}

impl SameSitePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            SameSitePolicy::Strict => "Strict",
            SameSitePolicy::Lax => "Lax",
            SameSitePolicy::None => "None",
        }
    }
}

impl fmt::Display for SameSitePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SameSitePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Strict" => Ok(SameSitePolicy::Strict),
            "Lax" => Ok(SameSitePolicy::Lax),
            "None" => Ok(SameSitePolicy::None),
            other => Err(format!("invalid SameSite policy '{}': must be Strict, Lax, or None", other)),
        }
    }
}
