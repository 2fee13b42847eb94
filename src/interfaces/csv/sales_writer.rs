use crate::domain::sale::SaleRecord;
use crate::error::Result;
use std::io::Write;

/// Writes the sales ledger as CSV: `id,created_at,customer,units,total`.
///
/// Totals are written at full precision; rounding is left to whoever displays them.
pub struct SalesWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> SalesWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    pub fn write_sales(&mut self, sales: &[SaleRecord]) -> Result<()> {
        self.writer
            .write_record(["id", "created_at", "customer", "units", "total"])?;
        for sale in sales {
            self.writer.write_record([
                sale.id.to_string(),
                sale.created_at.to_rfc3339(),
                sale.customer_name.clone(),
                sale.unit_count().to_string(),
                sale.total.value().to_string(),
            ])?;
        }
        self.writer.flush()?;
        Ok(())
    }
}
