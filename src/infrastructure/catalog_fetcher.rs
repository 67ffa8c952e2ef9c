//! # Catalog Fetcher
//!
//! Fetches one page of the upstream product feed per call. The fetcher is
//! stateless: the cursor belongs to the session that calls it.

use async_trait::async_trait;
use tracing::{debug, info, warn};
use url::Url;

use crate::domain::{PAGE_SIZE, PageResponse};
use crate::infrastructure::catalog_error::CatalogError;
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::http_client::HttpClient;

/// Source of catalog pages.
///
/// Implementations must not keep pagination state; the same offset may be
/// requested again after a failure.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Fetch the page starting at `offset`. An offset at or past the remote
    /// total yields an empty page, not an error.
    async fn fetch_page(&self, offset: u64) -> Result<PageResponse, CatalogError>;

    /// Records per page; the session advances its cursor by this step
    fn page_size(&self) -> u64 {
        PAGE_SIZE
    }

    /// Name used in logs
    fn source_name(&self) -> &str {
        "catalog"
    }
}

/// Catalog source backed by the upstream HTTP feed
#[derive(Debug, Clone)]
pub struct HttpCatalogFetcher {
    client: HttpClient,
    base_url: Url,
    api_key: String,
}

impl HttpCatalogFetcher {
    pub fn new(client: HttpClient, base_url: &str, api_key: &str) -> Result<Self, CatalogError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| CatalogError::configuration(format!("Invalid catalog URL '{base_url}': {e}")))?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(CatalogError::configuration(format!(
                "Unsupported catalog URL scheme '{}'",
                base_url.scheme()
            )));
        }

        let api_key = api_key.trim();
        if api_key.is_empty() {
            return Err(CatalogError::configuration(
                "Catalog API key is missing (set catalog.api_key or CATALOG_API_KEY)",
            ));
        }

        Ok(Self {
            client,
            base_url,
            api_key: api_key.to_string(),
        })
    }

    /// Build the fetcher and its HTTP client from the application config
    pub fn from_config(config: &AppConfig) -> Result<Self, CatalogError> {
        let client = HttpClient::from_http_config(&config.http)?
            .with_context_label(&config.catalog.profile);
        Self::new(client, &config.catalog.base_url, &config.catalog.api_key)
    }

    /// `<base_url>?api_key=<key>&offset=<offset>`, keeping any query the base already had
    pub fn page_url(&self, offset: u64) -> Url {
        let mut url = self.base_url.clone();
        url.query_pairs_mut()
            .append_pair("api_key", &self.api_key)
            .append_pair("offset", &offset.to_string());
        url
    }
}

#[async_trait]
impl CatalogSource for HttpCatalogFetcher {
    async fn fetch_page(&self, offset: u64) -> Result<PageResponse, CatalogError> {
        let url = self.page_url(offset);
        debug!("Fetching catalog page at offset {}", offset);

        let page: PageResponse = self.client.fetch_json(&url).await?;

        if !page.count_matches_records() {
            warn!(
                "Catalog page at offset {} declares count={} but carries {} records",
                offset,
                page.count,
                page.art_cat_m.len()
            );
        }
        info!(
            "📦 Catalog page at offset {}: {} records (total {})",
            offset, page.count, page.total_count
        );

        Ok(page)
    }

    fn source_name(&self) -> &str {
        self.base_url.host_str().unwrap_or("catalog")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::http_client::HttpClientConfig;

    fn client() -> HttpClient {
        HttpClient::with_config(HttpClientConfig::default()).unwrap()
    }

    #[test]
    fn page_url_carries_key_and_offset() {
        let fetcher =
            HttpCatalogFetcher::new(client(), "https://feed.example/v1/art_cat_m", "K3Y").unwrap();
        let url = fetcher.page_url(2000);
        assert_eq!(url.as_str(), "https://feed.example/v1/art_cat_m?api_key=K3Y&offset=2000");
    }

    #[test]
    fn existing_query_is_kept() {
        let fetcher =
            HttpCatalogFetcher::new(client(), "https://feed.example/v1?lang=es", "K3Y").unwrap();
        assert_eq!(
            fetcher.page_url(0).as_str(),
            "https://feed.example/v1?lang=es&api_key=K3Y&offset=0"
        );
    }

    #[test]
    fn missing_key_is_a_configuration_error() {
        let err = HttpCatalogFetcher::new(client(), "https://feed.example/v1", "  ").unwrap_err();
        assert!(matches!(err, CatalogError::Configuration { .. }));
    }

    #[test]
    fn invalid_url_is_a_configuration_error() {
        let err = HttpCatalogFetcher::new(client(), "not a url", "K3Y").unwrap_err();
        assert!(matches!(err, CatalogError::Configuration { .. }));

        let err = HttpCatalogFetcher::new(client(), "ftp://feed.example/v1", "K3Y").unwrap_err();
        assert!(matches!(err, CatalogError::Configuration { .. }));
    }

    #[test]
    fn http_feed_pages_are_fixed_at_one_thousand() {
        let fetcher = HttpCatalogFetcher::new(client(), "https://feed.example/v1", "K3Y").unwrap();
        assert_eq!(fetcher.page_size(), 1000);
    }

    #[test]
    fn source_name_is_the_host() {
        let fetcher =
            HttpCatalogFetcher::new(client(), "https://feed.example/v1/art_cat_m", "K3Y").unwrap();
        assert_eq!(fetcher.source_name(), "feed.example");
    }
}
