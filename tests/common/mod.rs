#![allow(dead_code)]

use omnistore::domain::catalog::{CatalogItem, Category, ProductId};
use omnistore::domain::money::Money;
use rust_decimal::Decimal;
use std::fs::File;
use std::io::Error;
use std::path::Path;

pub const CATALOG_FIXTURE: &str = "tests/fixtures/catalog.csv";

pub fn product(id: u64, name: &str, price: Decimal) -> CatalogItem {
    CatalogItem::new(
        ProductId(id),
        name,
        Money::new(price).unwrap(),
        Category::Groceries,
    )
    .unwrap()
}

/// Writes a catalog CSV with `rows` products priced 0.10 each.
pub fn generate_catalog(path: &Path, rows: usize) -> Result<(), Error> {
    let file = File::create(path)?;
    let mut wtr = csv::WriterBuilder::new().from_writer(file);

    wtr.write_record(["id", "name", "description", "price", "category", "image_url"])?;

    for i in 1..=rows {
        let id = i.to_string();
        let name = format!("Item {i}");
        wtr.write_record([id.as_str(), name.as_str(), "", "0.10", "snacks", ""])?;
    }

    wtr.flush()?;
    Ok(())
}
