//! HTTP client abstraction for testability

use std::time::Duration;

use super::types::ProviderError;

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Browser-like identification sent with every tile request.
///
/// Some public tile services refuse requests without one.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_9_3) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/35.0.1916.47 Safari/537.36";

/// Trait for HTTP client operations.
///
/// This abstraction allows for dependency injection and easier testing
/// by enabling mock HTTP clients in tests.
pub trait HttpClient: Send + Sync {
    /// Performs an HTTP GET request and returns the response body.
    fn get(&self, url: &str) -> Result<Vec<u8>, ProviderError>;
}

/// Real HTTP client implementation using blocking reqwest.
pub struct ReqwestClient {
    client: reqwest::blocking::Client,
}

impl ReqwestClient {
    /// Creates a client with the default timeout and user agent.
    pub fn new() -> Result<Self, ProviderError> {
        Self::with_settings(DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT)
    }

    /// Creates a client with a custom timeout and user agent.
    pub fn with_settings(timeout_secs: u64, user_agent: &str) -> Result<Self, ProviderError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(user_agent)
            .build()
            .map_err(|e| {
                ProviderError::HttpError(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self { client })
    }
}

impl HttpClient for ReqwestClient {
    fn get(&self, url: &str) -> Result<Vec<u8>, ProviderError> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| ProviderError::HttpError(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        response
            .bytes()
            .map(|b| b.to_vec())
            .map_err(|e| ProviderError::HttpError(format!("Failed to read response: {}", e)))
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::sync::Mutex;

    type Responder = Box<dyn Fn(&str) -> Result<Vec<u8>, ProviderError> + Send + Sync>;

    /// Mock HTTP client that records every requested URL.
    pub struct MockHttpClient {
        responder: Responder,
        pub requests: Mutex<Vec<String>>,
    }

    impl MockHttpClient {
        /// Answers every request with the same result.
        pub fn fixed(response: Result<Vec<u8>, ProviderError>) -> Self {
            Self::with_responder(move |_| response.clone())
        }

        /// Answers each request by calling `responder` with the URL.
        pub fn with_responder<F>(responder: F) -> Self
        where
            F: Fn(&str) -> Result<Vec<u8>, ProviderError> + Send + Sync + 'static,
        {
            Self {
                responder: Box::new(responder),
                requests: Mutex::new(Vec::new()),
            }
        }

        pub fn requested_urls(&self) -> Vec<String> {
            self.requests.lock().unwrap().clone()
        }
    }

    impl HttpClient for MockHttpClient {
        fn get(&self, url: &str) -> Result<Vec<u8>, ProviderError> {
            self.requests.lock().unwrap().push(url.to_string());
            (self.responder)(url)
        }
    }

    #[test]
    fn test_mock_client_success() {
        let mock = MockHttpClient::fixed(Ok(vec![1, 2, 3, 4]));

        let result = mock.get("http://example.com");
        assert_eq!(result.unwrap(), vec![1, 2, 3, 4]);
        assert_eq!(mock.requested_urls(), vec!["http://example.com"]);
    }

    #[test]
    fn test_mock_client_error() {
        let mock = MockHttpClient::fixed(Err(ProviderError::HttpError("Test error".to_string())));

        let result = mock.get("http://example.com");
        assert!(result.is_err());
    }

    #[test]
    fn test_reqwest_client_builds() {
        assert!(ReqwestClient::new().is_ok());
        assert!(ReqwestClient::with_settings(5, "mapblend-test").is_ok());
    }

    #[test]
    fn test_http_status_display() {
        let err = ProviderError::HttpStatus {
            status: 404,
            url: "https://tiles.example/1".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP 404 from https://tiles.example/1");
    }
}
