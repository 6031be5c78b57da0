//! Logging configuration

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Env: QUIRE_LOG_LEVEL (error, warn, info, debug, trace, off)
    /// Default: "info"
    pub level: String,

    /// Env: QUIRE_LOG_FORMAT ("text" or "json")
    /// Default: "text"
    pub format: String,

    /// Include the module path in each line
    /// Default: false
    pub include_target: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), format: "text".to_string(), include_target: false }
    }
}

impl LoggingConfig {
    pub fn merge(&mut self, other: Self) {
        *self = other;
    }

    pub fn apply_env_vars(&mut self) {
        if let Ok(level) = env::var("QUIRE_LOG_LEVEL") {
            self.level = level;
        }
        if let Ok(format) = env::var("QUIRE_LOG_FORMAT") {
            self.format = format;
        }
    }

    pub fn level_filter(&self) -> Result<log::LevelFilter> {
        match self.level.parse() {
            Ok(level) => Ok(level),
            Err(_) => bail!("Invalid log level '{}': use error, warn, info, debug, trace or off", self.level),
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.level_filter()?;
        if !["text", "json"].contains(&self.format.as_str()) {
            bail!("Invalid log format '{}': must be text or json", self.format);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_parsing() {
        let cfg = LoggingConfig { level: "debug".into(), ..Default::default() };
        assert_eq!(cfg.level_filter().unwrap(), log::LevelFilter::Debug);
        assert!(LoggingConfig { level: "loud".into(), ..Default::default() }.validate().is_err());
    }

    #[test]
    fn test_format_validation() {
        assert!(LoggingConfig::default().validate().is_ok());
        assert!(LoggingConfig { format: "xml".into(), ..Default::default() }.validate().is_err());
    }
}
