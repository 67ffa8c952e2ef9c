//! Property tests for paging a complete feed through a session
mod common;

use std::sync::Arc;

use catalog_sync_lib::{CatalogProfile, CatalogSession, SessionPhase};
use common::{ScriptedSource, page};
use proptest::prelude::*;

/// Script the pages a well-behaved feed of `total` records returns for `page_size`
fn full_feed(total: usize, page_size: usize) -> ScriptedSource {
    let mut script = Vec::new();
    let mut start = 0;
    loop {
        let count = page_size.min(total - start);
        script.push(Ok(page(total as u64, start, count)));
        start += count;
        if start >= total {
            break;
        }
    }
    ScriptedSource::new(script).with_page_size(page_size as u64)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn paging_collects_every_record_once(total in 0usize..600, page_size in 1usize..200) {
        let source = Arc::new(full_feed(total, page_size));
        let session = CatalogSession::new(
            Arc::clone(&source),
            CatalogProfile::storefront(),
        );

        tokio_test::block_on(async {
            session.load_more().await.unwrap();
            while session.snapshot().has_more {
                session.load_more().await.unwrap();
            }
        });

        let snap = session.snapshot();
        prop_assert_eq!(snap.items.len(), total);
        prop_assert_eq!(snap.total_count, total as u64);
        prop_assert_eq!(snap.phase, SessionPhase::Complete);

        let expected_fetches = total.div_ceil(page_size).max(1);
        let offsets = source.requested_offsets();
        prop_assert_eq!(offsets.len(), expected_fetches);
        for (i, offset) in offsets.iter().enumerate() {
            prop_assert_eq!(*offset, (i * page_size) as u64);
        }

        for (i, product) in snap.items.iter().enumerate() {
            prop_assert_eq!(&product.sku, &format!("SKU-{i}"));
        }
    }

    #[test]
    fn has_more_tracks_cursor_against_total(total in 1usize..600, page_size in 1usize..200) {
        let source = Arc::new(full_feed(total, page_size));
        let session = CatalogSession::new(
            Arc::clone(&source),
            CatalogProfile::storefront(),
        );

        let mut loaded = 0usize;
        let mut offset = 0usize;
        loop {
            tokio_test::block_on(session.load_more()).unwrap();
            let count = page_size.min(total - offset);
            loaded += count;
            let snap = session.snapshot();
            prop_assert_eq!(snap.items.len(), loaded);
            prop_assert_eq!(snap.has_more, offset + count < total);
            offset += page_size;
            if !snap.has_more {
                break;
            }
        }
    }
}
