//! Tile coordinates and mosaic grids.
//!
//! A [`TileCoord`] addresses one tile of the service's global tiling scheme
//! (Web Mercator, the WMTS `PM` tile matrix set). A [`MosaicGrid`] is an N×N
//! block of such tiles anchored at its top-left tile.
//!
//! # Ordering convention
//!
//! Grid cells are always enumerated row-major: the outer loop walks rows
//! (`j`, the y axis) and the inner loop walks columns (`i`, the x axis). The
//! flat index of cell `(i, j)` is `j * N + i`. Fetch order, tile filenames and
//! pixel placement all use this convention, so a grid never comes out
//! transposed.

use std::f64::consts::PI;
use std::fmt;

use thiserror::Error;

/// Minimum latitude representable in Web Mercator.
pub const MIN_LAT: f64 = -85.05112878;
/// Maximum latitude representable in Web Mercator.
pub const MAX_LAT: f64 = 85.05112878;
/// Maximum zoom level accepted for geographic conversion.
pub const MAX_ZOOM: u8 = 22;

/// Errors raised while building coordinates or grids.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoordError {
    #[error("Invalid latitude {0}: must be within [-85.05112878, 85.05112878]")]
    InvalidLatitude(f64),

    #[error("Invalid longitude {0}: must be within [-180, 180]")]
    InvalidLongitude(f64),

    #[error("Invalid zoom level {0}: must be at most 22")]
    InvalidZoom(u8),

    /// A grid must contain at least one tile.
    #[error("Invalid grid: map size must be at least 1")]
    EmptyGrid,

    /// The far corner of the grid does not fit in tile coordinate space.
    #[error("Grid of size {size} anchored at col {col_base}, row {row_base} overflows tile coordinates")]
    GridOverflow {
        size: u32,
        col_base: u32,
        row_base: u32,
    },
}

/// Position of one tile in the service's tiling scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileCoord {
    /// Tile column (x, increases eastward)
    pub col: u32,
    /// Tile row (y, increases southward)
    pub row: u32,
    /// Zoom level
    pub zoom: u8,
}

impl TileCoord {
    pub fn new(col: u32, row: u32, zoom: u8) -> Self {
        Self { col, row, zoom }
    }

    /// Returns the tile containing the given geographic position.
    ///
    /// Useful for locating the top-left tile of a map from a coordinate
    /// picked on a web map.
    pub fn from_lat_lon(lat: f64, lon: f64, zoom: u8) -> Result<Self, CoordError> {
        if !(MIN_LAT..=MAX_LAT).contains(&lat) {
            return Err(CoordError::InvalidLatitude(lat));
        }
        if !(-180.0..=180.0).contains(&lon) {
            return Err(CoordError::InvalidLongitude(lon));
        }
        if zoom > MAX_ZOOM {
            return Err(CoordError::InvalidZoom(zoom));
        }

        let n = 2.0_f64.powi(zoom as i32);
        let max_index = n - 1.0;

        let col = ((lon + 180.0) / 360.0 * n).floor().min(max_index) as u32;
        let lat_rad = lat.to_radians();
        let row = ((1.0 - lat_rad.tan().asinh() / PI) / 2.0 * n)
            .floor()
            .clamp(0.0, max_index) as u32;

        Ok(Self { col, row, zoom })
    }
}

impl fmt::Display for TileCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "col={} row={} zoom={}", self.col, self.row, self.zoom)
    }
}

/// An N×N block of tiles at a single zoom level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MosaicGrid {
    size: u32,
    col_base: u32,
    row_base: u32,
    zoom: u8,
}

impl MosaicGrid {
    /// Creates a grid of `size`×`size` tiles whose top-left tile is
    /// `(col_base, row_base)`.
    pub fn new(size: u32, col_base: u32, row_base: u32, zoom: u8) -> Result<Self, CoordError> {
        if size == 0 {
            return Err(CoordError::EmptyGrid);
        }

        let overflow = CoordError::GridOverflow {
            size,
            col_base,
            row_base,
        };
        col_base.checked_add(size - 1).ok_or(overflow.clone())?;
        row_base.checked_add(size - 1).ok_or(overflow)?;

        Ok(Self {
            size,
            col_base,
            row_base,
            zoom,
        })
    }

    /// Creates a grid anchored at the given top-left tile.
    pub fn anchored_at(size: u32, top_left: TileCoord) -> Result<Self, CoordError> {
        Self::new(size, top_left.col, top_left.row, top_left.zoom)
    }

    /// Side length in tiles.
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Total number of tiles (N²).
    pub fn tile_count(&self) -> usize {
        (self.size as usize) * (self.size as usize)
    }

    pub fn zoom(&self) -> u8 {
        self.zoom
    }

    /// Top-left tile of the grid.
    pub fn origin(&self) -> TileCoord {
        TileCoord::new(self.col_base, self.row_base, self.zoom)
    }

    /// Tile coordinate of grid cell `(i, j)`; `i` is the column offset.
    pub fn coord_at(&self, i: u32, j: u32) -> TileCoord {
        TileCoord::new(self.col_base + i, self.row_base + j, self.zoom)
    }

    /// Iterates over all cells in row-major order.
    pub fn cells(&self) -> GridCells {
        GridCells {
            grid: *self,
            index: 0,
        }
    }
}

/// One cell of a [`MosaicGrid`]: its grid position and tile coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridCell {
    /// Column offset within the grid (x axis)
    pub i: u32,
    /// Row offset within the grid (y axis)
    pub j: u32,
    pub coord: TileCoord,
}

/// Row-major iterator over the cells of a [`MosaicGrid`].
#[derive(Debug, Clone)]
pub struct GridCells {
    grid: MosaicGrid,
    index: usize,
}

impl Iterator for GridCells {
    type Item = GridCell;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.grid.tile_count() {
            return None;
        }

        let size = self.grid.size as usize;
        let i = (self.index % size) as u32;
        let j = (self.index / size) as u32;
        self.index += 1;

        Some(GridCell {
            i,
            j,
            coord: self.grid.coord_at(i, j),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.grid.tile_count() - self.index;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for GridCells {}
