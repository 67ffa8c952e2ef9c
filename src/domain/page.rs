//! Page of the paginated catalog feed.
//!
//! The wire shape is `{ "total_count": .., "count": .., "art_cat_m": [..] }`.
//! All three keys are required; a body missing any of them is malformed.

use serde::{Deserialize, Serialize};

use super::product::{CatalogRecord, ParseOptions, Product};

/// Records per page served by the feed. The request carries no page size,
/// so the cursor always advances by this step.
pub const PAGE_SIZE: u64 = 1000;

/// Page body exactly as decoded from the feed
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageResponse {
    pub total_count: u64,
    pub count: u64,
    pub art_cat_m: Vec<CatalogRecord>,
}

impl PageResponse {
    pub fn new(total_count: u64, records: Vec<CatalogRecord>) -> Self {
        Self {
            total_count,
            count: records.len() as u64,
            art_cat_m: records,
        }
    }

    /// `count` as declared by the feed may disagree with the records it sent
    pub fn count_matches_records(&self) -> bool {
        self.count == self.art_cat_m.len() as u64
    }

    /// Map every record through `options`, keeping arrival order
    pub fn into_page(self, options: &ParseOptions) -> Page {
        Page {
            total_count: self.total_count,
            count: self.count,
            items: self
                .art_cat_m
                .into_iter()
                .map(|record| Product::from_record(record, options))
                .collect(),
        }
    }
}

/// Decoded page ready to be appended to the collection
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    /// Authoritative remote total
    pub total_count: u64,
    /// Size of this page as declared by the feed
    pub count: u64,
    pub items: Vec<Product>,
}

impl Page {
    /// Whether records remain past this page when it was requested at `offset_used`
    pub const fn has_more_after(&self, offset_used: u64) -> bool {
        offset_used.saturating_add(self.count) < self.total_count
    }
}
