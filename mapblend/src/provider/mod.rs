//! Tile service abstraction.
//!
//! This module provides the traits and the WMTS implementation used to
//! download raw tile bytes from a remote tiled-imagery service.
//!
//! ```ignore
//! use mapblend::provider::{ReqwestClient, UrlTemplate, WmtsProvider};
//!
//! let client = ReqwestClient::new()?;
//! let provider = WmtsProvider::new(client, UrlTemplate::ign());
//! let bytes = provider.fetch_tile(coord, &layer)?;
//! ```

mod http;
mod types;
mod wmts;

pub use http::{HttpClient, ReqwestClient, DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT};
pub use types::{ProviderError, TileProvider};
pub use wmts::{UrlTemplate, WmtsProvider, IGN_WMTS_TEMPLATE};

#[cfg(test)]
pub use http::tests::MockHttpClient;
