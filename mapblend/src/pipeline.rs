//! Map building pipeline.
//!
//! Sequences the three stages for the usual job of producing a blended map:
//!
//! ```text
//! ┌──────────┐    tile paths    ┌──────────┐   final.<ext>   ┌──────────┐
//! │  Fetch   │ ───────────────► │ Assemble │ ──────────────► │  Blend   │
//! │ N² tiles │   (row-major)    │  mosaic  │   (per layer)   │ 2 layers │
//! └──────────┘                  └──────────┘                 └──────────┘
//! ```
//!
//! Every stage runs to completion before the next starts. Any error aborts
//! the run; files already written stay on disk.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{info, instrument};

use crate::blend::{blend_files, BlendError, FadeMode, Opacity};
use crate::config::ConfigFile;
use crate::coord::MosaicGrid;
use crate::fetch::{FetchError, ProgressCallback, TileFetcher};
use crate::layer::{LayerId, LayerStore};
use crate::mosaic::{assemble, save_mosaic, MosaicError, DEFAULT_TILE_SIZE};
use crate::provider::{ProviderError, ReqwestClient, TileProvider, WmtsProvider};

/// Errors that can abort a pipeline run.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// HTTP client setup failed.
    #[error("Failed to set up tile service: {0}")]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Mosaic(#[from] MosaicError),

    #[error(transparent)]
    Blend(#[from] BlendError),
}

/// Parameters of the blend step.
#[derive(Debug, Clone, Copy)]
pub struct BlendOptions {
    pub opacity: Opacity,
    pub mode: FadeMode,
}

impl Default for BlendOptions {
    fn default() -> Self {
        Self {
            opacity: Opacity::DEFAULT,
            mode: FadeMode::default(),
        }
    }
}

/// Builds layer mosaics and blended maps from a tile provider.
pub struct MapBuilder<P: TileProvider> {
    fetcher: TileFetcher<P>,
    root: PathBuf,
    tile_size: u32,
    tile_extension: String,
    mosaic_extension: String,
}

impl<P: TileProvider> MapBuilder<P> {
    /// Creates a builder writing under the current directory with default
    /// tile settings.
    pub fn new(provider: P) -> Self {
        Self {
            fetcher: TileFetcher::new(provider),
            root: PathBuf::from("."),
            tile_size: DEFAULT_TILE_SIZE,
            tile_extension: LayerStore::DEFAULT_TILE_EXTENSION.to_string(),
            mosaic_extension: LayerStore::DEFAULT_MOSAIC_EXTENSION.to_string(),
        }
    }

    /// Creates a builder using the tile, mosaic and output settings of
    /// `config`.
    pub fn with_config(provider: P, config: &ConfigFile) -> Self {
        Self::new(provider)
            .with_root(config.output.directory.clone())
            .with_tile_size(config.tiles.size)
            .with_tile_extension(config.tiles.extension.clone())
            .with_mosaic_extension(config.mosaic.extension.clone())
    }

    /// Sets the directory under which layer directories are created.
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    pub fn with_tile_size(mut self, tile_size: u32) -> Self {
        self.tile_size = tile_size;
        self
    }

    pub fn with_tile_extension(mut self, extension: impl Into<String>) -> Self {
        self.tile_extension = extension.into();
        self
    }

    pub fn with_mosaic_extension(mut self, extension: impl Into<String>) -> Self {
        self.mosaic_extension = extension.into();
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    pub fn fetcher(&self) -> &TileFetcher<P> {
        &self.fetcher
    }

    /// File layout of `layer` under this builder's root.
    pub fn store(&self, layer: &LayerId) -> LayerStore {
        LayerStore::new(&self.root, layer.clone())
            .with_tile_extension(self.tile_extension.clone())
            .with_mosaic_extension(self.mosaic_extension.clone())
    }

    /// Fetches every tile of `grid` for `layer`, assembles them and saves
    /// the mosaic. Returns the mosaic path.
    #[instrument(skip(self, grid, progress), fields(layer = %layer))]
    pub fn build_layer(
        &self,
        grid: &MosaicGrid,
        layer: &LayerId,
        progress: Option<&ProgressCallback>,
    ) -> Result<PathBuf, PipelineError> {
        let store = self.store(layer);
        let tiles = self.fetcher.fetch_grid(grid, &store, progress)?;

        let mosaic = assemble(&tiles, grid.size(), self.tile_size)?;
        let path = store.mosaic_path();
        save_mosaic(&mosaic, &path)?;

        info!(path = %path.display(), "Layer mosaic built");
        Ok(path)
    }

    /// Builds the `base` and `overlay` mosaics for the same grid, then
    /// blends the overlay over the base into `output`.
    ///
    /// `progress` is called with the layer about to be fetched and returns
    /// the callback to use for that layer.
    pub fn build_blended_map<F>(
        &self,
        grid: &MosaicGrid,
        base: &LayerId,
        overlay: &LayerId,
        output: &Path,
        options: BlendOptions,
        mut progress: F,
    ) -> Result<PathBuf, PipelineError>
    where
        F: FnMut(&LayerId) -> Option<ProgressCallback>,
    {
        // Fail on an unusable output path before any download
        crate::blend::check_output_format(output)?;

        let callback = progress(base);
        let base_mosaic = self.build_layer(grid, base, callback.as_ref())?;

        let callback = progress(overlay);
        let overlay_mosaic = self.build_layer(grid, overlay, callback.as_ref())?;

        blend_files(
            &overlay_mosaic,
            &base_mosaic,
            output,
            options.opacity,
            options.mode,
        )?;

        info!(output = %output.display(), "Blended map written");
        Ok(output.to_path_buf())
    }
}

/// Creates a builder backed by the real WMTS service described in `config`.
pub fn http_map_builder(
    config: &ConfigFile,
) -> Result<MapBuilder<WmtsProvider<ReqwestClient>>, PipelineError> {
    let client = ReqwestClient::with_settings(config.service.timeout, &config.service.user_agent)?;
    let provider = WmtsProvider::new(client, config.service.url_template.clone());
    Ok(MapBuilder::with_config(provider, config))
}
