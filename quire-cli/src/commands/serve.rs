use anyhow::{Context, Result};
use quire_core::config::QuireConfig;
use quire_core::http::QuireServer;
use std::path::Path;

/// Load configuration, install the logger and serve until interrupted.
pub fn run(config_path: &Path) -> Result<()> {
    let config = QuireConfig::load_from(config_path)
        .with_context(|| format!("Failed to load {}", config_path.display()))?;
    quire_core::logging::init_logging(&config.logging)?;

    let runtime = tokio::runtime::Runtime::new().context("Failed to start tokio runtime")?;
    runtime.block_on(async {
        tokio::select! {
            result = QuireServer::from_config(config).serve() => result,
            _ = tokio::signal::ctrl_c() => {
                log::info!("Shutting down");
                Ok(())
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_invalid_config_fails_before_binding() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[sessions]\nsecret = \"short\"\n").unwrap();
        let err = run(file.path()).unwrap_err();
        assert!(format!("{:#}", err).contains("[sessions]"));
    }
}
