//! Route guard configuration

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::env;

/// Which paths the request guard protects and where it sends people
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuardConfig {
    /// Path prefixes that require administrator access (segment-aware)
    /// Env: QUIRE_GUARD_PROTECTED (comma-separated)
    /// Default: ["/admin"]
    pub protected_prefixes: Vec<String>,

    /// Paths under a protected prefix that stay public
    /// Env: QUIRE_GUARD_EXCLUDE (comma-separated)
    /// Default: []
    pub exclude: Vec<String>,

    /// Where unauthenticated visitors are sent
    /// Env: QUIRE_GUARD_SIGNIN_PATH
    /// Default: "/signin"
    pub signin_path: String,

    /// Where authenticated visitors without access are sent
    /// Env: QUIRE_GUARD_HOME_PATH
    /// Default: "/"
    pub home_path: String,

    /// Query parameter carrying the originally requested path
    /// Env: QUIRE_GUARD_REDIRECT_PARAM
    /// Default: "redirect"
    pub redirect_param: String,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            protected_prefixes: vec!["/admin".to_string()],
            exclude: Vec::new(),
            signin_path: "/signin".to_string(),
            home_path: "/".to_string(),
            redirect_param: "redirect".to_string(),
        }
    }
}

/// Segment-aware prefix match: `/admin` covers `/admin` and `/admin/x`, not `/administer`
pub fn path_has_prefix(path: &str, prefix: &str) -> bool {
    let prefix = prefix.trim_end_matches('/');
    if prefix.is_empty() {
        return true;
    }
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

fn split_list(value: &str) -> Vec<String> {
    value.split(',').map(|s| s.trim().to_string()).filter(|s| !s.is_empty()).collect()
}

impl GuardConfig {
    pub fn merge(&mut self, other: Self) {
        self.protected_prefixes = other.protected_prefixes;
        self.exclude = other.exclude;
        self.signin_path = other.signin_path;
        self.home_path = other.home_path;
        self.redirect_param = other.redirect_param;
    }

    pub fn apply_env_vars(&mut self) {
        if let Ok(protected) = env::var("QUIRE_GUARD_PROTECTED") {
            self.protected_prefixes = split_list(&protected);
        }

        if let Ok(exclude) = env::var("QUIRE_GUARD_EXCLUDE") {
            self.exclude = split_list(&exclude);
        }

        if let Ok(path) = env::var("QUIRE_GUARD_SIGNIN_PATH") {
            self.signin_path = path;
        }

        if let Ok(path) = env::var("QUIRE_GUARD_HOME_PATH") {
            self.home_path = path;
        }

        if let Ok(param) = env::var("QUIRE_GUARD_REDIRECT_PARAM") {
            self.redirect_param = param;
        }
    }

    /// Whether `path` is guarded under this configuration
    pub fn is_protected(&self, path: &str) -> bool {
        self.protected_prefixes.iter().any(|p| path_has_prefix(path, p))
            && !self.exclude.iter().any(|e| path_has_prefix(path, e))
    }

    pub fn validate(&self) -> Result<()> {
        for path in self.protected_prefixes.iter().chain(&self.exclude) {
            if !path.starts_with('/') {
                bail!("Invalid guard path '{}': must start with '/'", path);
            }
        }

        for (name, path) in [("signin_path", &self.signin_path), ("home_path", &self.home_path)] {
            if !path.starts_with('/') || path.starts_with("//") {
                bail!("Invalid {} '{}': must be a local absolute path", name, path);
            }
        }

        if self.is_protected(&self.signin_path) {
            bail!(
                "Invalid signin_path '{}': it is guarded, which would redirect forever",
                self.signin_path
            );
        }

        if self.is_protected(&self.home_path) {
            bail!(
                "Invalid home_path '{}': it is guarded, which would redirect forever",
                self.home_path
            );
        }

        if self.redirect_param.is_empty()
            || !self.redirect_param.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            bail!("Invalid redirect_param: use letters, digits and underscores");
        }

        Ok(())
    }
}
