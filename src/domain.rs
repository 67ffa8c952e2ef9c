//! Domain module - catalog and project entities
//!
//! This module contains the entities and value objects the dashboard works
//! with. Nothing in here performs I/O.
//!
//! Modern Rust module organization (Rust 2018+ style):
//! - Each module is its own file in the domain/ directory
//! - Public exports are defined here for convenience

pub mod page;
pub mod product;
pub mod project;

pub use page::{PAGE_SIZE, Page, PageResponse};
pub use product::{CatalogRecord, ParseOptions, Product};
pub use project::{ProgressLog, Project, ProjectError, ProjectStatus};
