//! Layer identifiers and the on-disk layout of a layer's files.
//!
//! Every layer owns one directory under the output root:
//!
//! ```text
//! <root>/<layer>/tile_<col>_<row>_<zoom>_<layer>.<tile_ext>   one per fetched tile
//! <root>/<layer>/final.<mosaic_ext>                           assembled mosaic
//! ```

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::coord::TileCoord;

/// Errors related to layer naming and layer directories.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Layer name cannot be used as a directory name.
    #[error("Invalid layer name '{name}': {reason}")]
    InvalidLayer { name: String, reason: &'static str },

    /// Failed to create a layer directory.
    #[error("Failed to create directory {path}: {source}")]
    CreateDir { path: PathBuf, source: io::Error },
}

/// Name of a data source/style on the remote tile service.
///
/// Doubles as the directory name of the layer, so it must be a single
/// path component.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LayerId(String);

impl LayerId {
    pub fn new(name: impl Into<String>) -> Result<Self, StorageError> {
        let name = name.into();
        let reason = if name.trim().is_empty() {
            Some("must not be empty")
        } else if name.contains('/') || name.contains('\\') {
            Some("must not contain path separators")
        } else if name == "." || name == ".." {
            Some("must not be a relative path component")
        } else {
            None
        };

        match reason {
            Some(reason) => Err(StorageError::InvalidLayer { name, reason }),
            None => Ok(Self(name)),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for LayerId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Creates `path` and any missing parents. An existing directory is not an
/// error.
pub fn ensure_dir(path: &Path) -> Result<(), StorageError> {
    fs::create_dir_all(path).map_err(|source| StorageError::CreateDir {
        path: path.to_path_buf(),
        source,
    })
}

/// Resolves file paths for one layer under an output root.
#[derive(Debug, Clone)]
pub struct LayerStore {
    root: PathBuf,
    layer: LayerId,
    tile_extension: String,
    mosaic_extension: String,
}

impl LayerStore {
    /// Default extension of fetched tiles (the service is asked for JPEG).
    pub const DEFAULT_TILE_EXTENSION: &'static str = "jpg";
    /// Default extension of the assembled mosaic (lossless).
    pub const DEFAULT_MOSAIC_EXTENSION: &'static str = "png";

    pub fn new(root: impl Into<PathBuf>, layer: LayerId) -> Self {
        Self {
            root: root.into(),
            layer,
            tile_extension: Self::DEFAULT_TILE_EXTENSION.to_string(),
            mosaic_extension: Self::DEFAULT_MOSAIC_EXTENSION.to_string(),
        }
    }

    /// Sets the extension used for tile files.
    pub fn with_tile_extension(mut self, extension: impl Into<String>) -> Self {
        self.tile_extension = extension.into();
        self
    }

    /// Sets the extension used for the mosaic file.
    pub fn with_mosaic_extension(mut self, extension: impl Into<String>) -> Self {
        self.mosaic_extension = extension.into();
        self
    }

    pub fn layer(&self) -> &LayerId {
        &self.layer
    }

    /// Directory holding this layer's tiles and mosaic.
    pub fn directory(&self) -> PathBuf {
        self.root.join(self.layer.as_str())
    }

    /// Path of the tile file for `coord`.
    pub fn tile_path(&self, coord: TileCoord) -> PathBuf {
        self.directory().join(format!(
            "tile_{}_{}_{}_{}.{}",
            coord.col, coord.row, coord.zoom, self.layer, self.tile_extension
        ))
    }

    /// Path of the assembled mosaic.
    pub fn mosaic_path(&self) -> PathBuf {
        self.directory()
            .join(format!("final.{}", self.mosaic_extension))
    }

    /// Creates the layer directory if it does not exist yet.
    pub fn ensure_directory(&self) -> Result<PathBuf, StorageError> {
        let dir = self.directory();
        ensure_dir(&dir)?;
        Ok(dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn ortho() -> LayerId {
        LayerId::new("ORTHOIMAGERY.ORTHOPHOTOS").unwrap()
    }

    #[test]
    fn test_layer_id_accepts_service_names() {
        let layer = LayerId::new("GEOGRAPHICALGRIDSYSTEMS.MAPS.SCAN25TOUR.CV").unwrap();
        assert_eq!(layer.as_str(), "GEOGRAPHICALGRIDSYSTEMS.MAPS.SCAN25TOUR.CV");
    }

    #[test]
    fn test_layer_id_rejects_unusable_names() {
        for name in ["", "   ", "a/b", "a\\b", ".", ".."] {
            assert!(
                matches!(LayerId::new(name), Err(StorageError::InvalidLayer { .. })),
                "{:?} should be rejected",
                name
            );
        }
    }

    #[test]
    fn test_tile_path_layout() {
        let store = LayerStore::new("/maps", ortho());
        let path = store.tile_path(TileCoord::new(33323, 24053, 16));

        assert_eq!(
            path,
            PathBuf::from(
                "/maps/ORTHOIMAGERY.ORTHOPHOTOS/tile_33323_24053_16_ORTHOIMAGERY.ORTHOPHOTOS.jpg"
            )
        );
    }

    #[test]
    fn test_mosaic_path_layout() {
        let store = LayerStore::new("/maps", ortho());
        assert_eq!(
            store.mosaic_path(),
            PathBuf::from("/maps/ORTHOIMAGERY.ORTHOPHOTOS/final.png")
        );

        let store = store.with_mosaic_extension("jpg").with_tile_extension("png");
        assert!(store.mosaic_path().ends_with("final.jpg"));
        assert!(store
            .tile_path(TileCoord::new(1, 2, 3))
            .to_string_lossy()
            .ends_with(".png"));
    }

    #[test]
    fn test_ensure_directory_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let store = LayerStore::new(temp.path(), ortho());

        let first = store.ensure_directory().unwrap();
        assert!(first.is_dir());

        let second = store.ensure_directory().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_ensure_dir_fails_when_file_is_in_the_way() {
        let temp = TempDir::new().unwrap();
        let blocker = temp.path().join("blocker");
        fs::write(&blocker, b"not a directory").unwrap();

        let result = ensure_dir(&blocker.join("layer"));
        assert!(matches!(result, Err(StorageError::CreateDir { .. })));
    }
}
