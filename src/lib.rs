//! Catalog Sync - paged product catalog synchronization
//!
//! Data layer behind the contracting/retail dashboard: loads the upstream
//! product feed page by page into a growing collection, filters it as the
//! user types, and tracks project progress.

// Module declarations
pub mod application;
pub mod domain;
pub mod infrastructure;

// Re-export the catalog session API for easier access
pub use application::{CatalogProfile, CatalogSession, CatalogSnapshot, SearchField, SessionPhase};
pub use domain::{Page, PageResponse, Product};
pub use infrastructure::{CatalogError, CatalogSource, HttpCatalogFetcher};
