//! Configuration system for Quire
//!
//! # Configuration Hierarchy
//!
//! Configuration values are resolved in the following order (highest priority wins):
//!
//! 1. **Code** (builder methods on the server) - Highest priority
//! 2. **Environment Variables** (`QUIRE_*`) - Override file config
//! 3. **Config File** (quire.toml) - Override defaults
//! 4. **Defaults** - Lowest priority
//!
//! # Example
//!
//! ```no_run
//! use quire_core::config::QuireConfig;
//!
//! let config = QuireConfig::load_from("quire.toml")?;
//! config.validate()?;
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod guard;
pub mod logging;
pub mod server;
pub mod sessions;
pub mod users;

pub use guard::GuardConfig;
pub use logging::LoggingConfig;
pub use server::ServerConfig;
pub use sessions::SessionsConfig;
pub use users::UserSeed;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default config file name
pub const DEFAULT_CONFIG_FILE: &str = "quire.toml";

/// Complete Quire configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuireConfig {
    pub server: ServerConfig,
    pub sessions: SessionsConfig,
    pub guard: GuardConfig,
    pub logging: LoggingConfig,
    pub users: Vec<UserSeed>,
}

impl QuireConfig {
    /// Load `quire.toml` from the working directory with full supersedence
    pub fn load() -> Result<Self> {
        Self::load_from(DEFAULT_CONFIG_FILE)
    }

    /// Load configuration from a specific file
    ///
    /// A missing file is not an error; defaults and environment still apply.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let mut config = Self::default();

        if path.exists() {
            let file_config = Self::from_file(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?;
            config.merge(file_config);
        } else {
            log::debug!("No config file at {}, using defaults", path.display());
        }

        config.apply_env_vars();

        Ok(config)
    }

    /// Load configuration from TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML config: {}", path.as_ref().display()))
    }

    /// Merge another config into this one (other takes priority)
    pub fn merge(&mut self, other: Self) {
        self.server.merge(other.server);
        self.sessions.merge(other.sessions);
        self.guard.merge(other.guard);
        self.logging.merge(other.logging);
        if !other.users.is_empty() {
            self.users = other.users;
        }
    }

    /// Apply environment variables to configuration
    pub fn apply_env_vars(&mut self) {
        self.server.apply_env_vars();
        self.sessions.apply_env_vars();
        self.guard.apply_env_vars();
        self.logging.apply_env_vars();
    }

    pub fn validate(&self) -> Result<()> {
        self.server.validate().context("[server]")?;
        self.sessions.validate().context("[sessions]")?;
        self.guard.validate().context("[guard]")?;
        self.logging.validate().context("[logging]")?;
        users::validate_seeds(&self.users).context("[[users]]")?;
        Ok(())
    }
}
