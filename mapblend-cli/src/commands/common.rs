//! Common types and utilities shared across CLI commands.

use std::path::PathBuf;

use clap::{ArgGroup, Args};
use indicatif::{ProgressBar, ProgressStyle};
use mapblend::blend::{FadeMode, Opacity};
use mapblend::config::ConfigFile;
use mapblend::coord::{MosaicGrid, TileCoord};
use mapblend::fetch::ProgressCallback;
use mapblend::layer::LayerId;
use mapblend::pipeline::BlendOptions;
use mapblend::provider::UrlTemplate;

use crate::error::CliError;

/// Options accepted by every subcommand.
#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// INI configuration file (defaults are used when omitted)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug-level logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Directory under which layer directories are created
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    /// Tile URL template with {layer}, {z}, {x} and {y} placeholders
    #[arg(long, global = true)]
    pub url_template: Option<String>,

    /// Tile side length in pixels
    #[arg(long, global = true, value_parser = clap::value_parser!(u32).range(1..))]
    pub tile_size: Option<u32>,
}

impl GlobalArgs {
    /// Loads the config file, if any, and applies command-line overrides.
    pub fn load_config(&self) -> Result<ConfigFile, CliError> {
        let mut config = ConfigFile::load_optional(self.config.as_deref())?;

        // CLI takes precedence over the file
        if let Some(root) = &self.root {
            config.output.directory = root.clone();
        }
        if let Some(template) = &self.url_template {
            config.service.url_template = UrlTemplate::parse(template.as_str())
                .map_err(|e| CliError::InvalidArgument(e.to_string()))?;
        }
        if let Some(size) = self.tile_size {
            config.tiles.size = size;
        }

        Ok(config)
    }
}

/// Where the tile grid sits.
#[derive(Debug, Args)]
#[command(group(ArgGroup::new("anchor").required(true).args(["col", "lat"])))]
pub struct GridArgs {
    /// Number of tiles per side of the square grid
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub map_size: u32,

    /// Column of the top-left tile
    #[arg(long, requires = "row")]
    pub col: Option<u32>,

    /// Row of the top-left tile
    #[arg(long, requires = "col")]
    pub row: Option<u32>,

    /// Latitude inside the top-left tile, in decimal degrees
    #[arg(long, requires = "lon", allow_negative_numbers = true)]
    pub lat: Option<f64>,

    /// Longitude inside the top-left tile, in decimal degrees
    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    pub lon: Option<f64>,

    /// Zoom level (tile matrix)
    #[arg(long)]
    pub zoom: u8,
}

impl GridArgs {
    /// Builds the grid from either tile indices or a geographic point.
    pub fn to_grid(&self) -> Result<MosaicGrid, CliError> {
        match (self.col, self.row, self.lat, self.lon) {
            (Some(col), Some(row), _, _) => Ok(MosaicGrid::new(self.map_size, col, row, self.zoom)?),
            (_, _, Some(lat), Some(lon)) => {
                let top_left = TileCoord::from_lat_lon(lat, lon, self.zoom)?;
                Ok(MosaicGrid::anchored_at(self.map_size, top_left)?)
            }
            _ => Err(CliError::InvalidArgument(
                "either --col and --row or --lat and --lon is required".to_string(),
            )),
        }
    }
}

/// Parses a layer name given on the command line.
pub fn parse_layer(name: &str) -> Result<LayerId, CliError> {
    Ok(LayerId::new(name)?)
}

/// Builds blend options from the `--opacity` and `--alpha-only` flags.
pub fn blend_options(opacity: f32, alpha_only: bool) -> Result<BlendOptions, CliError> {
    let opacity = Opacity::new(opacity).map_err(|e| CliError::InvalidArgument(e.to_string()))?;
    let mode = if alpha_only {
        FadeMode::AlphaOnly
    } else {
        FadeMode::TowardTransparent
    };
    Ok(BlendOptions { opacity, mode })
}

/// Creates a progress bar for fetching one layer, wrapped as a fetch
/// progress callback. The bar is not drawn when stderr is not a terminal.
pub fn fetch_progress(layer: &LayerId) -> ProgressCallback {
    let style = ProgressStyle::with_template(
        "{msg:>24} [{bar:40.cyan/blue}] {pos}/{len} tiles ({elapsed})",
    )
    .unwrap_or_else(|_| ProgressStyle::default_bar())
    .progress_chars("=> ");

    let bar = ProgressBar::new(0)
        .with_style(style)
        .with_message(layer.to_string());

    Box::new(move |done, total| {
        bar.set_length(total as u64);
        bar.set_position(done as u64);
        if done == total {
            bar.finish();
        }
    })
}
