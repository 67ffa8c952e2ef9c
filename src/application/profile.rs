//! Catalog profiles.
//!
//! A profile tells a catalog session which fields a query searches and
//! which optional attributes get parsed out of the feed. Views share one
//! session implementation and differ only in the profile they hand it.

use serde::{Deserialize, Serialize};

use crate::domain::{ParseOptions, Product};

/// Product field a query can match against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchField {
    Name,
    Sku,
    SupplierSku,
    Category,
}

impl SearchField {
    /// Value of this field on `product`; absent optional fields yield `None`
    pub fn value(self, product: &Product) -> Option<&str> {
        match self {
            Self::Name => Some(&product.name),
            Self::Sku => Some(&product.sku),
            Self::SupplierSku => product.supplier_sku.as_deref(),
            Self::Category => Some(&product.category),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogProfile {
    name: String,
    search_fields: Vec<SearchField>,
    parse_options: ParseOptions,
}

impl CatalogProfile {
    pub const STOREFRONT: &'static str = "storefront";
    pub const SUPPLIER: &'static str = "supplier";

    pub fn builder(name: impl Into<String>) -> CatalogProfileBuilder {
        CatalogProfileBuilder {
            name: name.into(),
            search_fields: Vec::new(),
            parse_options: ParseOptions::default(),
        }
    }

    /// Public catalog: searches name, sku and category, no supplier data
    pub fn storefront() -> Self {
        Self::builder(Self::STOREFRONT)
            .search(SearchField::Name)
            .search(SearchField::Sku)
            .search(SearchField::Category)
            .build()
    }

    /// Purchasing view: searches name, sku and supplier sku, parses every attribute
    pub fn supplier() -> Self {
        Self::builder(Self::SUPPLIER)
            .search(SearchField::Name)
            .search(SearchField::Sku)
            .search(SearchField::SupplierSku)
            .parse_options(ParseOptions::all())
            .build()
    }

    /// Look up a preset by its configured name
    pub fn by_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            Self::STOREFRONT => Some(Self::storefront()),
            Self::SUPPLIER => Some(Self::supplier()),
            _ => None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn search_fields(&self) -> &[SearchField] {
        &self.search_fields
    }

    pub const fn parse_options(&self) -> &ParseOptions {
        &self.parse_options
    }
}

impl Default for CatalogProfile {
    fn default() -> Self {
        Self::storefront()
    }
}

pub struct CatalogProfileBuilder {
    name: String,
    search_fields: Vec<SearchField>,
    parse_options: ParseOptions,
}

impl CatalogProfileBuilder {
    /// Add a searchable field; repeats are ignored
    #[must_use]
    pub fn search(mut self, field: SearchField) -> Self {
        if !self.search_fields.contains(&field) {
            self.search_fields.push(field);
        }
        self
    }

    #[must_use]
    pub fn parse_options(mut self, options: ParseOptions) -> Self {
        self.parse_options = options;
        self
    }

    #[must_use]
    pub fn parse_supplier_sku(mut self, enabled: bool) -> Self {
        self.parse_options.supplier_sku = enabled;
        self
    }

    #[must_use]
    pub fn parse_attributes(mut self, enabled: bool) -> Self {
        self.parse_options.attributes = enabled;
        self
    }

    #[must_use]
    pub fn parse_list_price(mut self, enabled: bool) -> Self {
        self.parse_options.list_price = enabled;
        self
    }

    #[must_use]
    pub fn parse_stock(mut self, enabled: bool) -> Self {
        self.parse_options.stock = enabled;
        self
    }

    /// Finish the profile. Without any searchable field, name and sku are used.
    pub fn build(self) -> CatalogProfile {
        let search_fields = if self.search_fields.is_empty() {
            vec![SearchField::Name, SearchField::Sku]
        } else {
            self.search_fields
        };

        CatalogProfile {
            name: self.name,
            search_fields,
            parse_options: self.parse_options,
        }
    }
}
