use crate::domain::catalog::{CatalogItem, CategoryFilter};
use crate::domain::ports::{CatalogStore, Notifier, SalesStore};
use crate::domain::sale::{NewSale, SaleId, SaleRecord};
use crate::error::{Result, StoreError};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::RwLock;

/// Newest first; equal timestamps fall back to the higher id.
pub(crate) fn newest_first(sales: &mut [SaleRecord]) {
    sales.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.id.cmp(&a.id))
    });
}

/// A thread-safe in-memory sales ledger.
///
/// Uses `Arc<RwLock<Vec<SaleRecord>>>` so clones share the same ledger.
/// Can be told to reject writes, which is how tests exercise the failure path.
#[derive(Default, Clone)]
pub struct InMemorySalesStore {
    sales: Arc<RwLock<Vec<SaleRecord>>>,
    fail_on_insert: Arc<AtomicBool>,
    insert_calls: Arc<AtomicUsize>,
}

impl InMemorySalesStore {
    /// Creates a new, empty in-memory sales store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every following `insert_sale` fail until switched back off.
    pub fn set_fail_on_insert(&self, fail: bool) {
        self.fail_on_insert.store(fail, Ordering::SeqCst);
    }

    /// How many times `insert_sale` has been called, failed calls included.
    pub fn insert_calls(&self) -> usize {
        self.insert_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SalesStore for InMemorySalesStore {
    async fn insert_sale(&self, sale: NewSale) -> Result<SaleRecord> {
        self.insert_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_on_insert.load(Ordering::SeqCst) {
            return Err(StoreError::PersistenceError(
                "sales store rejected the write".to_string(),
            ));
        }

        let mut sales = self.sales.write().await;
        let id = SaleId(sales.len() as u64 + 1);
        let record = sale.into_record(id, Utc::now());
        sales.push(record.clone());
        Ok(record)
    }

    async fn list_sales(&self) -> Result<Vec<SaleRecord>> {
        let mut sales = self.sales.read().await.clone();
        newest_first(&mut sales);
        Ok(sales)
    }
}

/// A thread-safe in-memory product catalog keyed by product id.
#[derive(Default, Clone)]
pub struct InMemoryCatalogStore {
    products: Arc<RwLock<HashMap<u64, CatalogItem>>>,
}

impl InMemoryCatalogStore {
    /// Creates a new, empty in-memory catalog.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CatalogStore for InMemoryCatalogStore {
    async fn insert_product(&self, product: CatalogItem) -> Result<()> {
        let mut products = self.products.write().await;
        products.insert(product.id.0, product);
        Ok(())
    }

    async fn list_products(&self, filter: CategoryFilter) -> Result<Vec<CatalogItem>> {
        let products = self.products.read().await;
        let mut listed: Vec<CatalogItem> = products
            .values()
            .filter(|p| filter.matches(p.category))
            .cloned()
            .collect();
        listed.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id)));
        Ok(listed)
    }
}

/// Records every notification instead of sending it. Can be told to fail.
#[derive(Default, Clone)]
pub struct InMemoryNotifier {
    sent: Arc<RwLock<Vec<(String, String)>>>,
    fail: Arc<AtomicBool>,
}

impl InMemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    /// `(destination, message)` pairs in the order they were sent.
    pub async fn sent(&self) -> Vec<(String, String)> {
        self.sent.read().await.clone()
    }
}

#[async_trait]
impl Notifier for InMemoryNotifier {
    async fn notify(&self, destination: &str, message: &str) -> Result<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(StoreError::HandoffError(
                "notification channel unavailable".to_string(),
            ));
        }
        self.sent
            .write()
            .await
            .push((destination.to_string(), message.to_string()));
        Ok(())
    }
}
