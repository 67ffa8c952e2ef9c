use serde::{Deserialize, Deserializer, Serialize};
use ts_rs::TS;

/// Separator used by the feed for the `urls_foto` field
const IMAGE_URL_SEPARATOR: char = ',';

/// Separator used by the feed for the `attributes` field
const ATTRIBUTE_SEPARATOR: char = '|';

/// Raw product record as delivered by the upstream feed (`art_cat_m` entries).
///
/// `sku` and `name` must be present; a `null` is tolerated and read as an
/// empty string because the feed is not strict about it. Every other field
/// may be absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogRecord {
    #[serde(deserialize_with = "null_as_empty")]
    pub sku: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub category: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub urls_foto: String,
    #[serde(default)]
    pub supplier_sku: Option<String>,
    #[serde(default)]
    pub attributes: Option<String>,
    #[serde(default)]
    pub list_price: Option<f64>,
    #[serde(default)]
    pub stock: Option<i64>,
}

impl CatalogRecord {
    /// Convenience constructor for the mandatory fields
    pub fn new(sku: impl Into<String>, name: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            sku: sku.into(),
            name: name.into(),
            category: category.into(),
            ..Self::default()
        }
    }

    pub fn with_images(mut self, urls_foto: impl Into<String>) -> Self {
        self.urls_foto = urls_foto.into();
        self
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Which optional attributes get parsed out of a raw record.
///
/// A disabled attribute stays empty on the resulting [`Product`] even when
/// the feed carries a value for it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseOptions {
    pub supplier_sku: bool,
    pub attributes: bool,
    pub list_price: bool,
    pub stock: bool,
}

impl ParseOptions {
    /// Parse every optional attribute
    pub const fn all() -> Self {
        Self {
            supplier_sku: true,
            attributes: true,
            list_price: true,
            stock: true,
        }
    }
}

/// Catalog product as held by the accumulated collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub sku: String,
    pub name: String,
    pub category: String,
    pub image_urls: Vec<String>,
    pub supplier_sku: Option<String>,
    pub attributes: Vec<String>,
    pub list_price: Option<f64>,
    #[ts(type = "number | null")]
    pub stock: Option<i64>,
}

impl Product {
    /// Build a product from a raw feed record. Image URLs and attributes are
    /// split here, once, and never touched again.
    pub fn from_record(record: CatalogRecord, options: &ParseOptions) -> Self {
        let CatalogRecord {
            sku,
            name,
            category,
            urls_foto,
            supplier_sku,
            attributes,
            list_price,
            stock,
        } = record;

        Self {
            sku,
            name,
            category,
            image_urls: split_image_urls(&urls_foto),
            supplier_sku: if options.supplier_sku {
                supplier_sku
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
            } else {
                None
            },
            attributes: match attributes {
                Some(raw) if options.attributes => split_attributes(&raw),
                _ => Vec::new(),
            },
            list_price: list_price.filter(|_| options.list_price),
            stock: stock.filter(|_| options.stock),
        }
    }

    /// First image of the product, if the feed listed any
    pub fn primary_image(&self) -> Option<&str> {
        self.image_urls.first().map(String::as_str)
    }

    /// Whether the product has more than one image (gallery view)
    pub fn has_gallery(&self) -> bool {
        self.image_urls.len() > 1
    }
}

/// Split the comma-separated `urls_foto` field, dropping blank entries.
/// Non-blank entries are kept verbatim, surrounding whitespace included.
pub fn split_image_urls(raw: &str) -> Vec<String> {
    raw.split(IMAGE_URL_SEPARATOR)
        .filter(|url| !url.trim().is_empty())
        .map(str::to_string)
        .collect()
}

/// Split the pipe-delimited `attributes` field into trimmed, non-blank entries
pub fn split_attributes(raw: &str) -> Vec<String> {
    raw.split(ATTRIBUTE_SEPARATOR)
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}
