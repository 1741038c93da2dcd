//! Settings structs and their defaults.

use std::path::PathBuf;

use crate::layer::LayerStore;
use crate::mosaic::DEFAULT_TILE_SIZE;
use crate::provider::{UrlTemplate, DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT};

/// Default log file, relative to the working directory.
pub const DEFAULT_LOG_FILE: &str = "logs/mapblend.log";

/// All configurable settings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigFile {
    pub service: ServiceSettings,
    pub tiles: TileSettings,
    pub mosaic: MosaicSettings,
    pub output: OutputSettings,
    pub logging: LoggingSettings,
}

/// `[service]` section: how tiles are requested.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceSettings {
    pub url_template: UrlTemplate,
    pub user_agent: String,
    /// Request timeout in seconds
    pub timeout: u64,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            url_template: UrlTemplate::ign(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// `[tiles]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct TileSettings {
    /// Tile side length in pixels
    pub size: u32,
    /// Extension of stored tile files
    pub extension: String,
}

impl Default for TileSettings {
    fn default() -> Self {
        Self {
            size: DEFAULT_TILE_SIZE,
            extension: LayerStore::DEFAULT_TILE_EXTENSION.to_string(),
        }
    }
}

/// `[mosaic]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct MosaicSettings {
    /// Extension (and therefore format) of the assembled mosaic
    pub extension: String,
}

impl Default for MosaicSettings {
    fn default() -> Self {
        Self {
            extension: LayerStore::DEFAULT_MOSAIC_EXTENSION.to_string(),
        }
    }
}

/// `[output]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputSettings {
    /// Root under which layer directories are created
    pub directory: PathBuf,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
        }
    }
}

/// `[logging]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingSettings {
    pub file: PathBuf,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            file: PathBuf::from(DEFAULT_LOG_FILE),
        }
    }
}
