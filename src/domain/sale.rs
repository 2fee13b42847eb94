use super::cart::LineItem;
use super::money::Money;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SaleId(pub u64);

impl std::fmt::Display for SaleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A sale ready to be persisted: the cart contents at checkout time.
///
/// Fields are private so the record cannot change between construction and
/// `SalesStore::insert_sale`; the store takes it by value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewSale {
    total: Money,
    items: Vec<LineItem>,
    customer_name: String,
}

impl NewSale {
    /// Computes the total from `items` so the two can never disagree.
    pub fn new(items: Vec<LineItem>, customer_name: impl Into<String>) -> Self {
        let total = items.iter().map(LineItem::line_total).sum();
        Self {
            total,
            items,
            customer_name: customer_name.into(),
        }
    }

    pub fn total(&self) -> Money {
        self.total
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn customer_name(&self) -> &str {
        &self.customer_name
    }

    /// Stamps the identity and creation time chosen by the store.
    pub fn into_record(self, id: SaleId, created_at: DateTime<Utc>) -> SaleRecord {
        SaleRecord {
            id,
            total: self.total,
            items: self.items,
            customer_name: self.customer_name,
            created_at,
        }
    }
}

/// A persisted sale as read back from the ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleRecord {
    pub id: SaleId,
    pub total: Money,
    pub items: Vec<LineItem>,
    pub customer_name: String,
    pub created_at: DateTime<Utc>,
}

impl SaleRecord {
    pub fn unit_count(&self) -> u64 {
        self.items
            .iter()
            .map(|line| u64::from(line.quantity.get()))
            .sum()
    }
}

/// Revenue across every sale in `sales`.
pub fn ledger_revenue(sales: &[SaleRecord]) -> Money {
    sales.iter().map(|sale| sale.total).sum()
}
