//! CLI runner for common setup and operations.
//!
//! Encapsulates config loading, logging initialization and builder creation
//! to reduce duplication across command handlers.

use mapblend::config::ConfigFile;
use mapblend::logging::{init_logging, LoggingGuard};
use mapblend::pipeline::{http_map_builder, MapBuilder};
use mapblend::provider::{ReqwestClient, WmtsProvider};
use tracing::info;

use crate::commands::common::GlobalArgs;
use crate::error::CliError;

/// Runner that manages CLI lifecycle and common operations.
pub struct CliRunner {
    /// Logging guard - keeps logging active while runner exists
    #[allow(dead_code)]
    logging_guard: LoggingGuard,
    /// Effective configuration (file plus command-line overrides)
    config: ConfigFile,
}

impl CliRunner {
    /// Create a new CLI runner, loading config and initializing logging.
    ///
    /// Events are mirrored to stderr only when stderr is not a terminal, so
    /// they never interleave with the progress bars.
    pub fn new(global: &GlobalArgs) -> Result<Self, CliError> {
        let config = global.load_config()?;

        let stderr_enabled = !atty::is(atty::Stream::Stderr);
        let logging_guard = init_logging(&config.logging.file, stderr_enabled, global.debug)
            .map_err(|e| CliError::LoggingInit(e.to_string()))?;

        Ok(Self {
            logging_guard,
            config,
        })
    }

    /// Log startup information for a command.
    pub fn log_startup(&self, command: &str) {
        info!("mapblend v{}", mapblend::VERSION);
        info!(
            command,
            url_template = self.config.service.url_template.as_str(),
            root = %self.config.output.directory.display(),
            "Starting command"
        );
    }

    /// Create a map builder talking to the configured tile service.
    pub fn map_builder(&self) -> Result<MapBuilder<WmtsProvider<ReqwestClient>>, CliError> {
        let builder = http_map_builder(&self.config)?;
        info!("HTTP client created");
        Ok(builder)
    }
}
