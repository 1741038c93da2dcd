//! Mosaic assembly - stitches an N×N grid of tiles into one raster.
//!
//! Tiles are supplied in row-major order (see [`crate::coord`]): the tile at
//! flat index `j * N + i` is grid cell `(i, j)` and lands at pixel offset
//! `(i * T, j * T)` in the `(N * T) × (N * T)` output.
//!
//! Unlike a streaming texture pipeline there is no placeholder for missing
//! data. Every tile must exist, decode, and measure exactly `T × T`;
//! anything else aborts the assembly.

use std::path::{Path, PathBuf};

use image::{imageops, DynamicImage, ImageError, ImageReader, RgbImage};
use thiserror::Error;
use tracing::{debug, info, instrument};

use crate::layer::{ensure_dir, StorageError};

/// Default side length of a service tile in pixels.
pub const DEFAULT_TILE_SIZE: u32 = 256;

/// Errors raised while assembling or saving a mosaic.
#[derive(Debug, Error)]
pub enum MosaicError {
    /// Grid side length or tile size is zero.
    #[error("Invalid mosaic parameters: grid size {grid_size}, tile size {tile_size}")]
    InvalidParameters { grid_size: u32, tile_size: u32 },

    /// The number of tiles supplied does not match the grid.
    #[error("Expected {expected} tiles for the grid, got {actual}")]
    TileCountMismatch { expected: usize, actual: usize },

    /// The mosaic would exceed the maximum image dimensions.
    #[error("Mosaic of {grid_size}×{grid_size} tiles of {tile_size} px is too large")]
    DimensionsOverflow { grid_size: u32, tile_size: u32 },

    /// A tile file could not be opened or decoded.
    #[error("Failed to decode tile {path}: {source}")]
    Decode { path: PathBuf, source: ImageError },

    /// A tile does not have the expected dimensions.
    #[error("Tile {tile} is {}×{}, expected {expected}×{expected}", .actual.0, .actual.1)]
    TileSizeMismatch {
        tile: String,
        expected: u32,
        actual: (u32, u32),
    },

    /// Writing the mosaic failed.
    #[error("Failed to save mosaic to {path}: {source}")]
    Save { path: PathBuf, source: ImageError },

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Checks the grid parameters and returns the output side length.
fn canvas_side(grid_size: u32, tile_size: u32, tile_count: usize) -> Result<u32, MosaicError> {
    if grid_size == 0 || tile_size == 0 {
        return Err(MosaicError::InvalidParameters {
            grid_size,
            tile_size,
        });
    }

    let expected = (grid_size as usize) * (grid_size as usize);
    if tile_count != expected {
        return Err(MosaicError::TileCountMismatch {
            expected,
            actual: tile_count,
        });
    }

    let overflow = || MosaicError::DimensionsOverflow {
        grid_size,
        tile_size,
    };
    let side = grid_size.checked_mul(tile_size).ok_or_else(overflow)?;

    // RGB8 buffer of side² × 3 bytes must be addressable
    let bytes = (side as u64)
        .checked_mul(side as u64)
        .and_then(|pixels| pixels.checked_mul(3))
        .ok_or_else(overflow)?;
    if usize::try_from(bytes).is_err() {
        return Err(overflow());
    }
    Ok(side)
}

/// Decodes an image file, picking the decoder from the file content.
///
/// Tile files keep whatever bytes the service returned, so the extension
/// may not match the actual format. The extension is only used when the
/// content is not recognized.
pub(crate) fn decode_file(path: &Path) -> Result<DynamicImage, ImageError> {
    ImageReader::open(path)?.with_guessed_format()?.decode()
}

/// Pixel offset of flat tile index `index` in a grid of side `grid_size`.
fn tile_offset(index: usize, grid_size: u32, tile_size: u32) -> (u32, u32) {
    let i = (index % grid_size as usize) as u32;
    let j = (index / grid_size as usize) as u32;
    (i * tile_size, j * tile_size)
}

fn check_tile_size(
    tile: &DynamicImage,
    tile_size: u32,
    label: impl FnOnce() -> String,
) -> Result<(), MosaicError> {
    if tile.width() != tile_size || tile.height() != tile_size {
        return Err(MosaicError::TileSizeMismatch {
            tile: label(),
            expected: tile_size,
            actual: (tile.width(), tile.height()),
        });
    }
    Ok(())
}

/// Incrementally places tiles on a canvas.
struct Canvas {
    image: RgbImage,
    grid_size: u32,
    tile_size: u32,
}

impl Canvas {
    fn new(grid_size: u32, tile_size: u32, tile_count: usize) -> Result<Self, MosaicError> {
        let side = canvas_side(grid_size, tile_size, tile_count)?;
        Ok(Self {
            image: RgbImage::new(side, side),
            grid_size,
            tile_size,
        })
    }

    fn place(&mut self, index: usize, tile: &DynamicImage) {
        let (x, y) = tile_offset(index, self.grid_size, self.tile_size);
        let rgb = tile.to_rgb8();
        imageops::replace(&mut self.image, &rgb, x as i64, y as i64);
    }
}

/// Assembles tile files into a mosaic.
///
/// `paths` must hold exactly `grid_size²` entries in row-major order, each
/// decoding to a `tile_size × tile_size` image.
#[instrument(skip(paths), fields(tiles = paths.len()))]
pub fn assemble<P: AsRef<Path>>(
    paths: &[P],
    grid_size: u32,
    tile_size: u32,
) -> Result<RgbImage, MosaicError> {
    let mut canvas = Canvas::new(grid_size, tile_size, paths.len())?;

    for (index, path) in paths.iter().enumerate() {
        let path = path.as_ref();
        let tile = decode_file(path).map_err(|source| MosaicError::Decode {
            path: path.to_path_buf(),
            source,
        })?;
        check_tile_size(&tile, tile_size, || path.display().to_string())?;

        canvas.place(index, &tile);
        debug!(index, path = %path.display(), "Tile placed");
    }

    info!(
        width = canvas.image.width(),
        height = canvas.image.height(),
        "Mosaic assembled"
    );
    Ok(canvas.image)
}

/// Assembles already decoded tiles into a mosaic.
///
/// Same contract as [`assemble`], for callers holding images in memory.
pub fn assemble_images(
    tiles: &[DynamicImage],
    grid_size: u32,
    tile_size: u32,
) -> Result<RgbImage, MosaicError> {
    let mut canvas = Canvas::new(grid_size, tile_size, tiles.len())?;

    for (index, tile) in tiles.iter().enumerate() {
        check_tile_size(tile, tile_size, || format!("#{}", index))?;
        canvas.place(index, tile);
    }

    Ok(canvas.image)
}

/// Writes a mosaic to `path`, creating the parent directory if needed.
///
/// The format follows the file extension. PNG keeps the mosaic lossless so
/// a reload is pixel-identical; JPEG re-encodes with quantization loss.
pub fn save_mosaic(image: &RgbImage, path: &Path) -> Result<(), MosaicError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        ensure_dir(parent)?;
    }

    image.save(path).map_err(|source| MosaicError::Save {
        path: path.to_path_buf(),
        source,
    })?;

    info!(path = %path.display(), "Mosaic saved");
    Ok(())
}
