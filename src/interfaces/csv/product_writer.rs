use crate::domain::catalog::CatalogItem;
use crate::error::Result;
use std::io::Write;

/// Writes a catalog listing as CSV: `id,name,category,price`.
pub struct ProductWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> ProductWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    pub fn write_products(&mut self, products: &[CatalogItem]) -> Result<()> {
        self.writer
            .write_record(["id", "name", "category", "price"])?;
        for product in products {
            self.writer.write_record([
                product.id.to_string(),
                product.name.clone(),
                product.category.slug().to_string(),
                product.price.value().to_string(),
            ])?;
        }
        self.writer.flush()?;
        Ok(())
    }
}
