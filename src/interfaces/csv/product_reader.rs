use crate::domain::catalog::{CatalogItem, Category, ProductId};
use crate::domain::money::Money;
use crate::error::{Result, StoreError};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Read;
use std::str::FromStr;

/// One catalog row as it appears in the file, before validation.
#[derive(Debug, Deserialize)]
struct ProductRow {
    id: u64,
    name: String,
    #[serde(default)]
    description: Option<String>,
    price: String,
    category: String,
    #[serde(default)]
    image_url: Option<String>,
}

impl TryFrom<ProductRow> for CatalogItem {
    type Error = StoreError;

    fn try_from(row: ProductRow) -> Result<Self> {
        let price = Decimal::from_str(row.price.trim()).map_err(|e| {
            StoreError::ValidationError(format!("Product {}: invalid price '{}': {e}", row.id, row.price))
        })?;
        let category: Category = row.category.parse()?;
        let mut item = CatalogItem::new(ProductId(row.id), row.name, Money::new(price)?, category)?;
        if let Some(description) = row.description {
            item = item.with_description(description);
        }
        if let Some(url) = row.image_url {
            item = item.with_image_url(url);
        }
        Ok(item)
    }
}

/// Reads catalog products from a CSV source.
///
/// Expects the header `id,name,description,price,category,image_url`. Fields are
/// trimmed and short rows are accepted, so the trailing optional columns may be
/// left out.
pub struct ProductReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> ProductReader<R> {
    /// Creates a new `ProductReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Returns an iterator that lazily reads and validates products.
    ///
    /// A bad row yields an error for that row only; reading continues with the next.
    pub fn products(self) -> impl Iterator<Item = Result<CatalogItem>> {
        self.reader.into_deserialize::<ProductRow>().map(|result| {
            result
                .map_err(StoreError::from)
                .and_then(CatalogItem::try_from)
        })
    }
}
