//! Filter view over the accumulated collection.
//!
//! Pure functions: the collection is never mutated and nothing is fetched.
//! Every call is a linear scan, which is fine because the collection only
//! grows when the user asks for another page.

use crate::application::profile::SearchField;
use crate::domain::Product;

/// Lowercased form of a user query; `None` means "no filter".
/// Whitespace is significant: only the empty string disables filtering.
pub fn normalize_query(query: &str) -> Option<String> {
    if query.is_empty() {
        None
    } else {
        Some(query.to_lowercase())
    }
}

/// Whether `product` matches an already normalized (lowercased) needle
pub fn matches(product: &Product, needle: &str, fields: &[SearchField]) -> bool {
    fields.iter().any(|field| {
        field
            .value(product)
            .is_some_and(|value| value.to_lowercase().contains(needle))
    })
}

/// Case-insensitive substring filter over `fields`, preserving order.
/// An empty query returns the whole collection.
pub fn filter<'a>(items: &'a [Product], query: &str, fields: &[SearchField]) -> Vec<&'a Product> {
    match normalize_query(query) {
        None => items.iter().collect(),
        Some(needle) => items
            .iter()
            .filter(|product| matches(product, &needle, fields))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::profile::CatalogProfile;
    use crate::domain::{CatalogRecord, ParseOptions};
    use rstest::rstest;

    fn catalog() -> Vec<Product> {
        let records = vec![
            CatalogRecord::new("SKU-1", "Cemento Portland 50kg", "Obra gruesa"),
            CatalogRecord::new("SKU-2", "Taladro percutor", "Herramientas"),
            CatalogRecord {
                supplier_sku: Some("PRV-778".into()),
                ..CatalogRecord::new("SKU-3", "Cable unipolar 2.5mm", "Electricidad")
            },
            CatalogRecord::new("SKU-10", "Amoladora angular", "Herramientas"),
        ];
        records
            .into_iter()
            .map(|r| Product::from_record(r, &ParseOptions::all()))
            .collect()
    }

    fn skus(found: &[&Product]) -> Vec<String> {
        found.iter().map(|p| p.sku.clone()).collect()
    }

    #[rstest]
    #[case("sku-1", &["SKU-1", "SKU-10"])]
    #[case("TALADRO", &["SKU-2"])]
    #[case("herramientas", &["SKU-2", "SKU-10"])]
    #[case("cable", &["SKU-3"])]
    #[case("  cable ", &[])]
    #[case("50kg ", &[])]
    #[case("   ", &[])]
    #[case("prv-778", &[])]
    #[case("inexistente", &[])]
    fn storefront_queries(#[case] query: &str, #[case] expected: &[&str]) {
        let items = catalog();
        let profile = CatalogProfile::storefront();
        let found = filter(&items, query, profile.search_fields());
        assert_eq!(skus(&found), expected);
    }

    #[rstest]
    #[case("prv-778", &["SKU-3"])]
    #[case("herramientas", &[])]
    #[case("amoladora", &["SKU-10"])]
    fn supplier_queries(#[case] query: &str, #[case] expected: &[&str]) {
        let items = catalog();
        let profile = CatalogProfile::supplier();
        let found = filter(&items, query, profile.search_fields());
        assert_eq!(skus(&found), expected);
    }

    #[test]
    fn empty_query_returns_everything_in_order() {
        let items = catalog();
        let found = filter(&items, "", CatalogProfile::storefront().search_fields());
        assert_eq!(found.len(), items.len());
        assert!(found.iter().zip(&items).all(|(a, b)| std::ptr::eq(*a, b)));
    }

    #[test]
    fn single_space_matches_fields_containing_a_space() {
        let items: Vec<Product> = [
            CatalogRecord::new("A-1", "Arena", "Áridos"),
            CatalogRecord::new("A-2", "Cemento 50kg", "Áridos"),
        ]
        .into_iter()
        .map(|r| Product::from_record(r, &ParseOptions::default()))
        .collect();

        let found = filter(&items, " ", CatalogProfile::storefront().search_fields());
        assert_eq!(skus(&found), vec!["A-2"]);
        assert!(filter(&items, "kg ", CatalogProfile::storefront().search_fields()).is_empty());
    }

    #[test]
    fn filtering_does_not_touch_the_collection() {
        let items = catalog();
        let before = items.clone();
        let _ = filter(&items, "sku", CatalogProfile::storefront().search_fields());
        assert_eq!(items, before);
    }

    #[test]
    fn unicode_case_is_folded() {
        let items = vec![Product::from_record(
            CatalogRecord::new("Ñ-1", "ÑANDÚ decorativo", "Jardín"),
            &ParseOptions::default(),
        )];
        let found = filter(&items, "ñandú", CatalogProfile::storefront().search_fields());
        assert_eq!(found.len(), 1);
    }
}
