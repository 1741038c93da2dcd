//! Provider types and traits

use thiserror::Error;

use crate::coord::TileCoord;
use crate::layer::LayerId;

/// Errors that can occur while talking to a tile service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// HTTP request failed before a response was received
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// Service answered with a non-success status
    #[error("HTTP {status} from {url}")]
    HttpStatus { status: u16, url: String },

    /// Service answered with an empty body
    #[error("Empty response from {url}")]
    EmptyResponse { url: String },

    /// URL template is missing a placeholder
    #[error("Invalid URL template '{template}': missing {placeholder} placeholder")]
    InvalidTemplate {
        template: String,
        placeholder: &'static str,
    },
}

/// Trait for tiled-imagery services.
///
/// Implementors return the encoded bytes of one tile (typically JPEG)
/// exactly as served. One call issues one request; there is no retry.
pub trait TileProvider: Send + Sync {
    /// Downloads the tile at `coord` for `layer`.
    fn fetch_tile(&self, coord: TileCoord, layer: &LayerId) -> Result<Vec<u8>, ProviderError>;

    /// Returns the provider's name for logging and identification.
    fn name(&self) -> &str;
}
