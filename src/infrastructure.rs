//! Infrastructure layer for configuration, logging and the upstream feed
//!
//! This module provides the HTTP client, the catalog fetcher, configuration
//! loading and the logging setup.

pub mod catalog_error; // Catalog error taxonomy
pub mod catalog_fetcher; // Paged feed access
pub mod config; // Configuration constants and helpers
pub mod http_client;
pub mod logging; // Logging infrastructure

// Re-export commonly used items
pub use catalog_error::CatalogError;
pub use catalog_fetcher::{CatalogSource, HttpCatalogFetcher};
pub use config::{AppConfig, ConfigManager};
pub use http_client::{HttpClient, HttpClientConfig};
pub use logging::{get_log_directory, init_logging, init_logging_with_config};
