//! mapblend - WMTS tile mosaics and layer blending
//!
//! Fetches an N×N grid of map tiles for a layer, stitches the tiles into a
//! single mosaic image, and composites one layer's mosaic over another's
//! with a configurable opacity.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use mapblend::blend::{FadeMode, Opacity};
//! use mapblend::config::ConfigFile;
//! use mapblend::coord::MosaicGrid;
//! use mapblend::layer::LayerId;
//! use mapblend::pipeline::{http_map_builder, BlendOptions};
//!
//! let builder = http_map_builder(&ConfigFile::default())?;
//! let grid = MosaicGrid::new(4, 16598, 11273, 15)?;
//!
//! builder.build_blended_map(
//!     &grid,
//!     &LayerId::new("ORTHOIMAGERY.ORTHOPHOTOS")?,
//!     &LayerId::new("GEOGRAPHICALGRIDSYSTEMS.MAPS.SCAN25TOUR.CV")?,
//!     Path::new("final.png"),
//!     BlendOptions { opacity: Opacity::new(0.4)?, mode: FadeMode::default() },
//!     |_| None,
//! )?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod blend;
pub mod config;
pub mod coord;
pub mod fetch;
pub mod layer;
pub mod logging;
pub mod mosaic;
pub mod pipeline;
pub mod provider;

/// Library version, as reported by the CLI at startup.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
