//! Sessions configuration

use crate::session::{CookieConfig, SameSitePolicy, SessionManagerConfig};
use anyhow::{anyhow, bail, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

/// Minimum signing secret length in bytes (HMAC-SHA256 block strength)
pub const MIN_SECRET_LEN: usize = 32;

/// Sessions configuration
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionsConfig {
    /// Secret used to sign credentials
    /// Env: QUIRE_SESSION_SECRET
    /// Default: empty (must be set)
    pub secret: String,

    /// Session cleanup interval in seconds
    /// Env: QUIRE_SESSION_CLEANUP_INTERVAL
    /// Default: 300 (5 minutes)
    pub cleanup_interval: u64,

    /// Session and credential lifetime in seconds
    /// Env: QUIRE_SESSION_MAX_AGE
    /// Default: 86400 (24 hours)
    pub max_age: u64,

    /// Cookie carrying the credential
    /// Env: QUIRE_SESSION_COOKIE_NAME
    /// Default: "quire_session"
    pub cookie_name: String,

    /// Set Secure flag on cookies (HTTPS only)
    /// Env: QUIRE_SESSION_COOKIE_SECURE
    /// Default: true
    pub cookie_secure: bool,

    /// SameSite policy: "Strict", "Lax", or "None"
    /// Env: QUIRE_SESSION_COOKIE_SAMESITE
    /// Default: "Lax"
    pub cookie_samesite: String,

    /// Accept `Authorization: Bearer` when no cookie is present
    /// Env: QUIRE_SESSION_BEARER_ENABLED
    /// Default: false
    pub bearer_enabled: bool,
}

impl std::fmt::Debug for SessionsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionsConfig")
            .field("secret", &"<redacted>")
            .field("cleanup_interval", &self.cleanup_interval)
            .field("max_age", &self.max_age)
            .field("cookie_name", &self.cookie_name)
            .field("cookie_secure", &self.cookie_secure)
            .field("cookie_samesite", &self.cookie_samesite)
            .field("bearer_enabled", &self.bearer_enabled)
            .finish()
    }
}

impl Default for SessionsConfig {
    fn default() -> Self {
        Self {
            secret: String::new(),
            cleanup_interval: 300,
            max_age: 86400,
            cookie_name: "quire_session".to_string(),
            cookie_secure: true,
            cookie_samesite: "Lax".to_string(),
            bearer_enabled: false,
        }
    }
}

impl SessionsConfig {
    pub fn merge(&mut self, other: Self) {
        self.secret = other.secret;
        self.cleanup_interval = other.cleanup_interval;
        self.max_age = other.max_age;
        self.cookie_name = other.cookie_name;
        self.cookie_secure = other.cookie_secure;
        self.cookie_samesite = other.cookie_samesite;
        self.bearer_enabled = other.bearer_enabled;
    }

    pub fn apply_env_vars(&mut self) {
        if let Ok(secret) = env::var("QUIRE_SESSION_SECRET") {
            self.secret = secret;
        }

        if let Ok(interval) = env::var("QUIRE_SESSION_CLEANUP_INTERVAL") {
            if let Ok(i) = interval.parse() {
                self.cleanup_interval = i;
            }
        }

        if let Ok(max_age) = env::var("QUIRE_SESSION_MAX_AGE") {
            if let Ok(m) = max_age.parse() {
                self.max_age = m;
            }
        }

        if let Ok(name) = env::var("QUIRE_SESSION_COOKIE_NAME") {
            self.cookie_name = name;
        }

        if let Ok(secure) = env::var("QUIRE_SESSION_COOKIE_SECURE") {
            self.cookie_secure = secure.parse().unwrap_or(true);
        }

        if let Ok(samesite) = env::var("QUIRE_SESSION_COOKIE_SAMESITE") {
            self.cookie_samesite = samesite;
        }

        if let Ok(bearer) = env::var("QUIRE_SESSION_BEARER_ENABLED") {
            self.bearer_enabled = bearer.parse().unwrap_or(false);
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.secret.len() < MIN_SECRET_LEN {
            bail!(
                "Invalid session secret: must be at least {} bytes (set QUIRE_SESSION_SECRET)",
                MIN_SECRET_LEN
            );
        }

        if self.cleanup_interval == 0 {
            bail!("Invalid cleanup_interval: must be greater than 0");
        }

        if self.max_age == 0 {
            bail!("Invalid max_age: must be greater than 0");
        }

        if self.cookie_name.is_empty() || self.cookie_name.contains([';', '=', ' ']) {
            bail!("Invalid cookie_name: must be a non-empty token");
        }

        let same_site = self.same_site()?;
        if same_site == SameSitePolicy::None && !self.cookie_secure {
            bail!("Invalid cookie_samesite: None requires cookie_secure = true");
        }

        Ok(())
    }

    pub fn same_site(&self) -> Result<SameSitePolicy> {
        self.cookie_samesite.parse().map_err(|e: String| anyhow!(e))
    }

    pub fn cookie_config(&self) -> Result<CookieConfig> {
        Ok(CookieConfig {
            name: self.cookie_name.clone(),
            secure: self.cookie_secure,
            same_site: self.same_site()?,
            max_age: Some(self.max_age as i64),
            ..CookieConfig::default()
        })
    }

    pub fn manager_config(&self) -> SessionManagerConfig {
        SessionManagerConfig::new()
            .with_cleanup_interval(Duration::from_secs(self.cleanup_interval))
            .with_max_age(Duration::from_secs(self.max_age))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> SessionsConfig {
        SessionsConfig { secret: "x".repeat(MIN_SECRET_LEN), ..Default::default() }
    }

    #[test]
    fn test_default_requires_secret() {
        let err = SessionsConfig::default().validate().unwrap_err();
        assert!(err.to_string().contains("secret"));
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn test_short_secret_rejected() {
        let cfg = SessionsConfig { secret: "x".repeat(MIN_SECRET_LEN - 1), ..valid() };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_zero_durations_rejected() {
        assert!(SessionsConfig { max_age: 0, ..valid() }.validate().is_err());
        assert!(SessionsConfig { cleanup_interval: 0, ..valid() }.validate().is_err());
    }

    #[test]
    fn test_same_site_values() {
        assert!(SessionsConfig { cookie_samesite: "Loose".into(), ..valid() }.validate().is_err());
        assert!(SessionsConfig { cookie_samesite: "Strict".into(), ..valid() }.validate().is_ok());
        let insecure_none =
            SessionsConfig { cookie_samesite: "None".into(), cookie_secure: false, ..valid() };
        assert!(insecure_none.validate().is_err());
    }

    #[test]
    fn test_cookie_config_follows_settings() {
        let cfg = SessionsConfig { cookie_name: "sid".into(), max_age: 60, ..valid() };
        let cookie = cfg.cookie_config().unwrap();
        assert_eq!(cookie.name, "sid");
        assert_eq!(cookie.max_age, Some(60));
        assert!(cookie.http_only);
    }

    #[test]
    fn test_debug_redacts_secret() {
        let cfg = SessionsConfig { secret: "super-secret-value-that-is-32-bytes!".into(), ..valid() };
        assert!(!format!("{:?}", cfg).contains("super-secret"));
    }
}
