//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use std::fmt;
use std::process;

use mapblend::blend::BlendError;
use mapblend::config::ConfigFileError;
use mapblend::coord::CoordError;
use mapblend::fetch::FetchError;
use mapblend::layer::StorageError;
use mapblend::pipeline::PipelineError;
use mapblend::provider::ProviderError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Configuration file could not be loaded
    Config(ConfigFileError),
    /// Invalid command-line argument
    InvalidArgument(String),
    /// Grid or coordinate error
    Grid(CoordError),
    /// Map building failed
    Pipeline(PipelineError),
    /// Blending two existing images failed
    Blend(BlendError),
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        // Print additional help for specific errors
        match self {
            CliError::Pipeline(PipelineError::Fetch(FetchError::Download {
                source: ProviderError::HttpStatus { .. },
                ..
            })) => {
                eprintln!();
                eprintln!("The tile service rejected the request. Check that:");
                eprintln!("  1. The layer name exists on the service");
                eprintln!("  2. The zoom level is available for that layer");
                eprintln!("  3. The tile column and row are inside the layer's extent");
            }
            CliError::Pipeline(PipelineError::Blend(BlendError::SizeMismatch { .. }))
            | CliError::Blend(BlendError::SizeMismatch { .. }) => {
                eprintln!();
                eprintln!("Both layers must be built with the same grid and tile size.");
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(e) => write!(f, "Configuration error: {}", e),
            CliError::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            CliError::Grid(e) => write!(f, "Invalid grid: {}", e),
            CliError::Pipeline(e) => write!(f, "Map build failed: {}", e),
            CliError::Blend(e) => write!(f, "Blend failed: {}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Config(e) => Some(e),
            CliError::Grid(e) => Some(e),
            CliError::Pipeline(e) => Some(e),
            CliError::Blend(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::Config(e)
    }
}

impl From<CoordError> for CliError {
    fn from(e: CoordError) -> Self {
        CliError::Grid(e)
    }
}

impl From<PipelineError> for CliError {
    fn from(e: PipelineError) -> Self {
        CliError::Pipeline(e)
    }
}

impl From<BlendError> for CliError {
    fn from(e: BlendError) -> Self {
        CliError::Blend(e)
    }
}

impl From<StorageError> for CliError {
    fn from(e: StorageError) -> Self {
        CliError::InvalidArgument(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_display_includes_cause() {
        let err = CliError::from(CoordError::InvalidZoom(30));
        assert_eq!(
            err.to_string(),
            "Invalid grid: Invalid zoom level 30: must be at most 22"
        );
        assert!(err.source().is_some());
    }

    #[test]
    fn test_invalid_layer_name_is_argument_error() {
        let err = CliError::from(mapblend::layer::LayerId::new("a/b").unwrap_err());
        assert!(matches!(err, CliError::InvalidArgument(_)));
        assert!(err.source().is_none());
    }
}
