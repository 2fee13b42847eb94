use super::catalog::{CatalogItem, CategoryFilter};
use super::sale::{NewSale, SaleRecord};
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// The sales ledger.
#[async_trait]
pub trait SalesStore: Send + Sync {
    /// Persists `sale`, assigning its id and creation time.
    async fn insert_sale(&self, sale: NewSale) -> Result<SaleRecord>;
    /// All sales, newest first.
    async fn list_sales(&self) -> Result<Vec<SaleRecord>>;
}

#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn insert_product(&self, product: CatalogItem) -> Result<()>;
    /// Products matching `filter`, newest first.
    async fn list_products(&self, filter: CategoryFilter) -> Result<Vec<CatalogItem>>;
}

/// Relays an order summary to an outside channel.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, destination: &str, message: &str) -> Result<()>;
}

pub type SalesStoreRef = Arc<dyn SalesStore>;
pub type CatalogStoreBox = Box<dyn CatalogStore>;
pub type NotifierRef = Arc<dyn Notifier>;
