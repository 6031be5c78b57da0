//! Quire Logging
//!
//! Built on the standard `log` crate: library code uses `log::info!` and
//! friends, and binaries install [`QuireLogger`] once with [`init_logging`].
//!
//! # Example
//!
//! ```rust,no_run
//! use quire_core::config::LoggingConfig;
//!
//! quire_core::logging::init_logging(&LoggingConfig::default()).unwrap();
//! log::info!("Server starting on port {}", 8080);
//! ```

pub mod formatter;

pub use formatter::{LogEntry, LogFormat};

use crate::config::LoggingConfig;
use anyhow::{anyhow, Result};
use std::io::Write;

/// Initialize the Quire logging system
///
/// Safe to call more than once: if a logger is already installed (by an
/// earlier call or by a test harness) the existing one is kept.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let logger = QuireLogger::from_config(config)?;
    let max_level = logger.level;

    match log::set_boxed_logger(Box::new(logger)) {
        Ok(()) => {
            log::set_max_level(max_level);
            Ok(())
        }
        Err(_) => {
            log::debug!("Logger already initialized, keeping existing one");
            Ok(())
        }
    }
}

/// Quire's implementation of the `log::Log` trait
///
/// Writes one line per record to stderr so stdout stays free for command
/// output.
pub struct QuireLogger {
    level: log::LevelFilter,
    format: LogFormat,
    include_target: bool,
}

impl QuireLogger {
    pub fn from_config(config: &LoggingConfig) -> Result<Self> {
        let level = config.level_filter()?;
        let format = LogFormat::parse(&config.format)
            .ok_or_else(|| anyhow!("Invalid log format '{}'", config.format))?;
        Ok(Self { level, format, include_target: config.include_target })
    }

    pub fn render(&self, record: &log::Record) -> String {
        self.format.format_entry(&LogEntry::from_record(record), self.include_target)
    }
}

impl log::Log for QuireLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let line = self.render(record);
        let _ = writeln!(std::io::stderr().lock(), "{}", line);
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}
