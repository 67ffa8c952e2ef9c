//! Accumulated catalog collection and its fetch cursor.
//!
//! Pages are appended in arrival order and never deduplicated: the feed makes
//! no uniqueness promise across pages, so repeated skus are kept verbatim.
//! The collection is shared copy-on-write with published snapshots.

use std::sync::Arc;

use crate::domain::{Page, Product};

#[derive(Debug, Clone)]
pub struct Accumulator {
    items: Arc<Vec<Product>>,
    offset: u64,
    page_size: u64,
    has_more: bool,
    total_count: u64,
    pages_loaded: u32,
}

impl Accumulator {
    pub fn new(page_size: u64) -> Self {
        Self {
            items: Arc::new(Vec::new()),
            offset: 0,
            page_size: page_size.max(1),
            has_more: true,
            total_count: 0,
            pages_loaded: 0,
        }
    }

    /// Drop everything and rewind the cursor to the first page
    pub fn reset(&mut self) {
        self.items = Arc::new(Vec::new());
        self.offset = 0;
        self.has_more = true;
        self.total_count = 0;
        self.pages_loaded = 0;
    }

    /// Append `page`, fetched at `offset_used`, without moving the cursor
    pub fn append(&mut self, page: Page, offset_used: u64) {
        self.has_more = page.has_more_after(offset_used);
        self.total_count = page.total_count;
        self.pages_loaded += 1;
        Arc::make_mut(&mut self.items).extend(page.items);
    }

    /// Move the cursor forward by one page
    pub fn advance(&mut self) {
        self.offset = self.offset.saturating_add(self.page_size);
    }

    /// Append a page fetched at the current cursor, then advance
    pub fn apply_page(&mut self, page: Page) {
        self.append(page, self.offset);
        self.advance();
    }

    pub fn items(&self) -> &[Product] {
        &self.items
    }

    /// Shared handle on the collection for snapshots
    pub fn shared_items(&self) -> Arc<Vec<Product>> {
        Arc::clone(&self.items)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub const fn offset(&self) -> u64 {
        self.offset
    }

    pub const fn page_size(&self) -> u64 {
        self.page_size
    }

    pub const fn has_more(&self) -> bool {
        self.has_more
    }

    pub const fn total_count(&self) -> u64 {
        self.total_count
    }

    pub const fn pages_loaded(&self) -> u32 {
        self.pages_loaded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CatalogRecord, ParseOptions};

    fn page(total_count: u64, start: usize, count: usize) -> Page {
        Page {
            total_count,
            count: count as u64,
            items: (start..start + count)
                .map(|i| {
                    Product::from_record(
                        CatalogRecord::new(format!("SKU-{i}"), format!("Producto {i}"), "General"),
                        &ParseOptions::default(),
                    )
                })
                .collect(),
        }
    }

    #[test]
    fn three_pages_of_a_2500_record_feed() {
        let mut acc = Accumulator::new(1000);

        acc.apply_page(page(2500, 0, 1000));
        assert_eq!(acc.len(), 1000);
        assert!(acc.has_more());
        assert_eq!(acc.offset(), 1000);

        acc.apply_page(page(2500, 1000, 1000));
        assert_eq!(acc.len(), 2000);
        assert!(acc.has_more());

        acc.apply_page(page(2500, 2000, 500));
        assert_eq!(acc.len(), 2500);
        assert!(!acc.has_more());
        assert_eq!(acc.total_count(), 2500);
        assert_eq!(acc.pages_loaded(), 3);

        assert_eq!(acc.items()[0].sku, "SKU-0");
        assert_eq!(acc.items()[2499].sku, "SKU-2499");
    }

    #[test]
    fn duplicates_are_kept_in_arrival_order() {
        let mut acc = Accumulator::new(2);
        acc.apply_page(page(4, 0, 2));
        // Upstream shifted: the second page repeats SKU-1
        acc.apply_page(page(4, 1, 2));

        let skus: Vec<_> = acc.items().iter().map(|p| p.sku.as_str()).collect();
        assert_eq!(skus, vec!["SKU-0", "SKU-1", "SKU-1", "SKU-2"]);
    }

    #[test]
    fn reset_clears_collection_and_cursor() {
        let mut acc = Accumulator::new(1000);
        acc.apply_page(page(1500, 0, 1000));
        acc.reset();

        assert!(acc.is_empty());
        assert_eq!(acc.offset(), 0);
        assert!(acc.has_more());
        assert_eq!(acc.total_count(), 0);
        assert_eq!(acc.pages_loaded(), 0);
    }

    #[test]
    fn snapshots_keep_their_view_after_append() {
        let mut acc = Accumulator::new(10);
        acc.apply_page(page(20, 0, 10));
        let snapshot = acc.shared_items();

        acc.apply_page(page(20, 10, 10));
        assert_eq!(snapshot.len(), 10);
        assert_eq!(acc.len(), 20);
    }

    #[test]
    fn empty_page_past_the_end_stops_pagination() {
        let mut acc = Accumulator::new(1000);
        acc.append(page(2500, 0, 0), 3000);
        assert!(acc.is_empty());
        assert!(!acc.has_more());
    }
}
