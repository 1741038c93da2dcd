//! Configuration file handling.
//!
//! Configuration is optional: without a file every setting takes its
//! default. A file is only read when a path is given explicitly.
//!
//! ```ini
//! [service]
//! url_template = https://data.geopf.fr/wmts?layer={layer}&...&TileMatrix={z}&TileCol={x}&TileRow={y}
//! user_agent = Mozilla/5.0 ...
//! timeout = 30
//!
//! [tiles]
//! size = 256
//! extension = jpg
//!
//! [mosaic]
//! extension = png
//!
//! [output]
//! directory = ./maps
//!
//! [logging]
//! file = logs/mapblend.log
//! ```

mod file;
mod parser;
mod settings;

pub use file::ConfigFileError;
pub use settings::{
    ConfigFile, LoggingSettings, MosaicSettings, OutputSettings, ServiceSettings, TileSettings,
    DEFAULT_LOG_FILE,
};
