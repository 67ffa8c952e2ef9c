//! Application layer module
//!
//! This module contains the catalog session and the pieces it is built
//! from: the accumulated collection, the filter view and the field profiles.

pub mod accumulator;
pub mod catalog_session;
pub mod filter;
pub mod profile;

pub use accumulator::Accumulator;
pub use catalog_session::{CatalogSession, CatalogSnapshot, SessionPhase};
pub use profile::{CatalogProfile, CatalogProfileBuilder, SearchField};
