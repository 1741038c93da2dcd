//! Tile fetching: download every tile of a grid and write it to disk.
//!
//! Fetching is strictly serial and follows the grid's row-major order. There
//! is no retry and no reuse of files from earlier runs: each call re-issues
//! the request and overwrites the tile file. The first failure aborts the
//! whole grid.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info, instrument};

use crate::coord::{MosaicGrid, TileCoord};
use crate::layer::{ensure_dir, LayerId, LayerStore, StorageError};
use crate::provider::{ProviderError, TileProvider};

/// Progress callback invoked after each tile with `(completed, total)`.
pub type ProgressCallback = Box<dyn Fn(usize, usize) + Send + Sync>;

/// Errors raised while fetching or persisting tiles.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The tile service failed to deliver a tile.
    #[error("Failed to fetch tile {coord} of layer '{layer}': {source}")]
    Download {
        coord: TileCoord,
        layer: LayerId,
        source: ProviderError,
    },

    /// Writing a tile file failed.
    #[error("Failed to write tile to {path}: {source}")]
    Write { path: PathBuf, source: io::Error },

    /// Preparing the layer directory failed.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Writes tile bytes verbatim to `path`, creating the parent directory if
/// needed. An existing file is overwritten.
pub fn persist_tile(bytes: &[u8], path: &Path) -> Result<(), FetchError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        ensure_dir(parent)?;
    }

    fs::write(path, bytes).map_err(|source| FetchError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Downloads tiles from a [`TileProvider`] into a layer's directory.
pub struct TileFetcher<P: TileProvider> {
    provider: P,
}

impl<P: TileProvider> TileFetcher<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Downloads one tile and returns its raw bytes.
    pub fn fetch_tile(&self, coord: TileCoord, layer: &LayerId) -> Result<Vec<u8>, FetchError> {
        self.provider
            .fetch_tile(coord, layer)
            .map_err(|source| FetchError::Download {
                coord,
                layer: layer.clone(),
                source,
            })
    }

    /// Downloads one tile and stores it at its deterministic path.
    pub fn fetch_to_store(&self, coord: TileCoord, store: &LayerStore) -> Result<PathBuf, FetchError> {
        let bytes = self.fetch_tile(coord, store.layer())?;
        let path = store.tile_path(coord);
        persist_tile(&bytes, &path)?;

        debug!(
            coord = %coord,
            path = %path.display(),
            bytes = bytes.len(),
            "Tile saved"
        );
        Ok(path)
    }

    /// Downloads every tile of `grid` in row-major order.
    ///
    /// Returns the tile paths in the same order, ready for
    /// [`assemble`](crate::mosaic::assemble).
    #[instrument(skip(self, store, progress), fields(layer = %store.layer(), size = grid.size()))]
    pub fn fetch_grid(
        &self,
        grid: &MosaicGrid,
        store: &LayerStore,
        progress: Option<&ProgressCallback>,
    ) -> Result<Vec<PathBuf>, FetchError> {
        store.ensure_directory()?;

        let total = grid.tile_count();
        let mut paths = Vec::with_capacity(total);

        info!(
            provider = self.provider.name(),
            origin = %grid.origin(),
            total,
            "Fetching tile grid"
        );

        for cell in grid.cells() {
            paths.push(self.fetch_to_store(cell.coord, store)?);

            if let Some(callback) = progress {
                callback(paths.len(), total);
            }
        }

        info!(tiles = paths.len(), "Tile grid fetched");
        Ok(paths)
    }
}
