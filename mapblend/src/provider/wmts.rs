//! WMTS tile provider.
//!
//! Tiles are requested with a plain `GetTile` KVP request. The URL is built
//! from a template carrying four placeholders:
//!
//! | Placeholder | Value           |
//! |-------------|-----------------|
//! | `{layer}`   | layer name      |
//! | `{z}`       | zoom level      |
//! | `{x}`       | tile column     |
//! | `{y}`       | tile row        |

use tracing::debug;

use crate::coord::TileCoord;
use crate::layer::LayerId;
use crate::provider::{HttpClient, ProviderError, TileProvider};

/// Public IGN Géoplateforme WMTS endpoint (Web Mercator `PM` matrix set, JPEG).
pub const IGN_WMTS_TEMPLATE: &str = "https://data.geopf.fr/wmts?layer={layer}&style=normal\
     &tilematrixset=PM&Service=WMTS&Request=GetTile&Version=1.0.0&Format=image/jpeg\
     &TileMatrix={z}&TileCol={x}&TileRow={y}";

const PLACEHOLDERS: [&str; 4] = ["{layer}", "{z}", "{x}", "{y}"];

/// Validated tile URL template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlTemplate(String);

impl UrlTemplate {
    /// Parses a template, requiring every placeholder to be present.
    pub fn parse(template: impl Into<String>) -> Result<Self, ProviderError> {
        let template = template.into();
        if let Some(&placeholder) = PLACEHOLDERS.iter().find(|p| !template.contains(*p)) {
            return Err(ProviderError::InvalidTemplate {
                template,
                placeholder,
            });
        }
        Ok(Self(template))
    }

    /// The IGN Géoplateforme template.
    pub fn ign() -> Self {
        Self(IGN_WMTS_TEMPLATE.to_string())
    }

    /// Builds the request URL for one tile.
    pub fn render(&self, coord: TileCoord, layer: &LayerId) -> String {
        self.0
            .replace("{layer}", layer.as_str())
            .replace("{z}", &coord.zoom.to_string())
            .replace("{x}", &coord.col.to_string())
            .replace("{y}", &coord.row.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for UrlTemplate {
    fn default() -> Self {
        Self::ign()
    }
}

/// Tile provider for WMTS-style services.
pub struct WmtsProvider<C: HttpClient> {
    http_client: C,
    template: UrlTemplate,
}

impl<C: HttpClient> WmtsProvider<C> {
    pub fn new(http_client: C, template: UrlTemplate) -> Self {
        Self {
            http_client,
            template,
        }
    }

    pub fn template(&self) -> &UrlTemplate {
        &self.template
    }

    #[cfg(test)]
    pub(crate) fn http_client(&self) -> &C {
        &self.http_client
    }
}

impl<C: HttpClient> TileProvider for WmtsProvider<C> {
    fn fetch_tile(&self, coord: TileCoord, layer: &LayerId) -> Result<Vec<u8>, ProviderError> {
        let url = self.template.render(coord, layer);
        debug!(url = %url, "Requesting tile");

        let bytes = self.http_client.get(&url)?;
        if bytes.is_empty() {
            return Err(ProviderError::EmptyResponse { url });
        }
        Ok(bytes)
    }

    fn name(&self) -> &str {
        "WMTS"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::MockHttpClient;

    fn layer() -> LayerId {
        LayerId::new("ORTHOIMAGERY.ORTHOPHOTOS").unwrap()
    }

    #[test]
    fn test_ign_template_url() {
        let url = UrlTemplate::ign().render(TileCoord::new(33323, 24053, 16), &layer());
        assert_eq!(
            url,
            "https://data.geopf.fr/wmts?layer=ORTHOIMAGERY.ORTHOPHOTOS&style=normal\
             &tilematrixset=PM&Service=WMTS&Request=GetTile&Version=1.0.0&Format=image/jpeg\
             &TileMatrix=16&TileCol=33323&TileRow=24053"
        );
    }

    #[test]
    fn test_custom_template_substitutes_column_as_x() {
        let template = UrlTemplate::parse("https://t.example/{layer}/{z}/{x}/{y}.png").unwrap();
        let url = template.render(TileCoord::new(7, 9, 4), &layer());
        assert_eq!(url, "https://t.example/ORTHOIMAGERY.ORTHOPHOTOS/4/7/9.png");
    }

    #[test]
    fn test_template_missing_placeholder() {
        let result = UrlTemplate::parse("https://t.example/{layer}/{z}/{x}");
        assert_eq!(
            result,
            Err(ProviderError::InvalidTemplate {
                template: "https://t.example/{layer}/{z}/{x}".to_string(),
                placeholder: "{y}",
            })
        );
    }

    #[test]
    fn test_fetch_tile_success() {
        let mock = MockHttpClient::fixed(Ok(vec![0xFF, 0xD8, 0xFF]));
        let provider = WmtsProvider::new(mock, UrlTemplate::ign());

        let bytes = provider
            .fetch_tile(TileCoord::new(1, 2, 3), &layer())
            .unwrap();
        assert_eq!(bytes, vec![0xFF, 0xD8, 0xFF]);

        let urls = provider.http_client().requested_urls();
        assert_eq!(urls.len(), 1);
        assert!(urls[0].contains("TileCol=1&TileRow=2"));
        assert!(urls[0].contains("TileMatrix=3"));
    }

    #[test]
    fn test_fetch_tile_propagates_http_error() {
        let mock = MockHttpClient::fixed(Err(ProviderError::HttpStatus {
            status: 500,
            url: "u".to_string(),
        }));
        let provider = WmtsProvider::new(mock, UrlTemplate::ign());

        let result = provider.fetch_tile(TileCoord::new(1, 2, 3), &layer());
        assert!(matches!(
            result,
            Err(ProviderError::HttpStatus { status: 500, .. })
        ));
    }

    #[test]
    fn test_fetch_tile_rejects_empty_body() {
        let mock = MockHttpClient::fixed(Ok(vec![]));
        let provider = WmtsProvider::new(mock, UrlTemplate::ign());

        let result = provider.fetch_tile(TileCoord::new(1, 2, 3), &layer());
        assert!(matches!(result, Err(ProviderError::EmptyResponse { .. })));
    }
}
