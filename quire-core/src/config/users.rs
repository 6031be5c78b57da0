//! Seed accounts loaded into the in-memory profile store

use crate::rbac::Role;
use crate::session::Profile;
use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One `[[users]]` entry
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSeed {
    pub user_id: String,

    /// Defaults to `user_id`
    #[serde(default)]
    pub display_name: Option<String>,

    /// "user", "editor" or "admin"; omitted means no role
    #[serde(default)]
    pub role: Option<String>,

    /// Argon2 PHC string, generate with `quire hash-password`
    #[serde(default)]
    pub password_hash: Option<String>,
}

impl std::fmt::Debug for UserSeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserSeed")
            .field("user_id", &self.user_id)
            .field("display_name", &self.display_name)
            .field("role", &self.role)
            .field("password_hash", &self.password_hash.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl UserSeed {
    pub fn to_profile(&self) -> Profile {
        Profile {
            user_id: self.user_id.clone(),
            display_name: self.display_name.clone().unwrap_or_else(|| self.user_id.clone()),
            role: self.role.clone(),
            password_hash: self.password_hash.clone(),
        }
    }
}

/// Reject seeds that would silently resolve to no role or collide
///
/// At runtime an unknown stored role fails closed; in configuration it is
/// almost certainly a typo, so it is an error here.
pub fn validate_seeds(users: &[UserSeed]) -> Result<()> {
    let mut seen = HashSet::new();
    for user in users {
        if user.user_id.trim().is_empty() {
            bail!("Invalid user: user_id cannot be empty");
        }
        if !seen.insert(user.user_id.as_str()) {
            bail!("Invalid user '{}': duplicate user_id", user.user_id);
        }
        if let Some(role) = &user.role {
            if let Err(e) = role.parse::<Role>() {
                bail!("Invalid user '{}': {}", user.user_id, e);
            }
            if role.as_str() != role.trim().to_ascii_lowercase() {
                bail!("Invalid user '{}': role must be stored lowercase", user.user_id);
            }
        }
        if let Some(hash) = &user.password_hash {
            if !hash.starts_with("$argon2") {
                bail!("Invalid user '{}': password_hash must be an Argon2 PHC string", user.user_id);
            }
        }
    }
    Ok(())
}
