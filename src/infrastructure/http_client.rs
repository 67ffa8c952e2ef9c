//! HTTP client for the catalog feed
//!
//! Thin wrapper over `reqwest` holding the transport settings. Requests are
//! single-shot: a failure is reported to the caller, who decides whether to
//! try again.

use reqwest::{Client, ClientBuilder, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, error, info};
use url::Url;

use crate::infrastructure::catalog_error::CatalogError;
use crate::infrastructure::config::HttpConfig;

/// Configuration for HTTP client behavior
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// User agent string
    pub user_agent: String,
    /// Whether to follow redirects
    pub follow_redirects: bool,
}

impl HttpClientConfig {
    pub fn from_http_config(http: &HttpConfig) -> Self {
        Self {
            timeout_seconds: http.request_timeout_seconds,
            user_agent: http.user_agent.clone(),
            follow_redirects: http.follow_redirects,
        }
    }
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self::from_http_config(&HttpConfig::default())
    }
}

/// HTTP client with typed error mapping
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    config: HttpClientConfig,
    /// Optional context label for provenance in logs (e.g., "storefront")
    context_label: Option<String>,
}

impl HttpClient {
    /// Create a new HTTP client with custom configuration
    pub fn with_config(config: HttpClientConfig) -> Result<Self, CatalogError> {
        let client = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(&config.user_agent)
            .gzip(true)
            .redirect(if config.follow_redirects {
                reqwest::redirect::Policy::limited(10)
            } else {
                reqwest::redirect::Policy::none()
            })
            .build()
            .map_err(|e| CatalogError::configuration(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            config,
            context_label: None,
        })
    }

    pub fn from_http_config(http: &HttpConfig) -> Result<Self, CatalogError> {
        Self::with_config(HttpClientConfig::from_http_config(http))
    }

    /// Set a human-readable context label for logging provenance (returns self for chaining)
    #[must_use]
    pub fn with_context_label(mut self, label: &str) -> Self {
        self.context_label = Some(label.to_string());
        self
    }

    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }

    /// Issue a GET and fail on any non-2xx status
    pub async fn fetch_response(&self, url: &Url) -> Result<Response, CatalogError> {
        let shown = loggable_url(url);
        match &self.context_label {
            Some(label) => info!("🌐 HTTP GET ({}): {}", label, shown),
            None => info!("🌐 HTTP GET: {}", shown),
        }

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| CatalogError::transport(format!("{} ({})", e.without_url(), shown)))?;

        let status = response.status();
        if !status.is_success() {
            error!("❌ HTTP error {}: {}", status, shown);
            return Err(CatalogError::http_status(
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unexpected status"),
            ));
        }

        Ok(response)
    }

    /// GET a JSON document; a body that does not match `T` is a decode error
    pub async fn fetch_json<T: DeserializeOwned>(&self, url: &Url) -> Result<T, CatalogError> {
        let response = self.fetch_response(url).await?;
        let body = response
            .text()
            .await
            .map_err(|e| {
                CatalogError::transport(format!("Failed to read response body: {}", e.without_url()))
            })?;

        debug!("Received {} bytes from {}", body.len(), loggable_url(url));
        Ok(serde_json::from_str(&body)?)
    }
}

/// URL without its query string, so credentials never reach the logs
pub fn loggable_url(url: &Url) -> String {
    let mut shown = url.clone();
    shown.set_query(None);
    shown.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = HttpClient::with_config(HttpClientConfig::default());
        assert!(client.is_ok());
    }

    #[test]
    fn test_custom_config() {
        let config = HttpClientConfig {
            timeout_seconds: 10,
            user_agent: "Test Agent".to_string(),
            follow_redirects: false,
        };

        let client = HttpClient::with_config(config).unwrap().with_context_label("test");
        assert_eq!(client.config().timeout_seconds, 10);
    }

    #[test]
    fn query_is_stripped_from_logged_urls() {
        let url = Url::parse("https://feed.example/v1/art_cat_m?api_key=secret&offset=1000").unwrap();
        assert_eq!(loggable_url(&url), "https://feed.example/v1/art_cat_m");
    }

    #[tokio::test]
    async fn unreachable_host_is_a_transport_error() {
        let client = HttpClient::with_config(HttpClientConfig {
            timeout_seconds: 2,
            ..HttpClientConfig::default()
        })
        .unwrap();
        // Port 9 on loopback is the discard port; nothing listens there in CI.
        let url = Url::parse("http://127.0.0.1:9/feed?api_key=SECRETKEY&offset=0").unwrap();
        let err = client.fetch_response(&url).await.unwrap_err();
        assert!(matches!(err, CatalogError::Network { status: None, .. }));
        assert!(!err.to_string().contains("SECRETKEY"));
    }
}
