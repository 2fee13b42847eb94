use crate::domain::sale::SaleRecord;
use std::fmt::Write;

/// Human-readable summary of a persisted sale, as relayed to the shop owner.
pub fn order_summary(sale: &SaleRecord) -> String {
    let mut out = format!("New order from {}\n", sale.customer_name);
    for line in &sale.items {
        // Writing to a String cannot fail.
        let _ = writeln!(
            out,
            "{} x {} - {}",
            line.quantity,
            line.name,
            line.line_total()
        );
    }
    let _ = writeln!(out, "Total: {}", sale.total);
    let _ = write!(out, "Date: {}", sale.created_at.format("%Y-%m-%d %H:%M UTC"));
    out
}
