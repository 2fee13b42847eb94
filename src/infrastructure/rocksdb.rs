use crate::domain::catalog::{CatalogItem, CategoryFilter};
use crate::domain::ports::{CatalogStore, SalesStore};
use crate::domain::sale::{NewSale, SaleId, SaleRecord};
use crate::error::{Result, StoreError};
use crate::infrastructure::in_memory::newest_first;
use async_trait::async_trait;
use chrono::Utc;
use rocksdb::{ColumnFamilyDescriptor, DB, IteratorMode, Options};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Column Family for the sales ledger.
pub const CF_SALES: &str = "sales";
/// Column Family for the product catalog.
pub const CF_PRODUCTS: &str = "products";

/// A persistent store implementation using RocksDB.
///
/// Keeps sales and products in separate Column Families, keyed by their
/// big-endian ids so iteration order follows id order.
///
/// This struct is thread-safe (`Clone` shares the underlying `Arc<DB>`).
#[derive(Clone)]
pub struct RocksDBStore {
    db: Arc<DB>,
    /// Serializes id assignment for new sales.
    sale_ids: Arc<Mutex<()>>,
}

impl RocksDBStore {
    /// Opens or creates a RocksDB instance at the specified path.
    ///
    /// Ensures that the required column families ("sales" and "products") exist.
    ///
    /// # Arguments
    ///
    /// * `path` - The filesystem path where the database will be stored.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_sales = ColumnFamilyDescriptor::new(CF_SALES, Options::default());
        let cf_products = ColumnFamilyDescriptor::new(CF_PRODUCTS, Options::default());

        let db = DB::open_cf_descriptors(&opts, path, vec![cf_sales, cf_products])?;

        Ok(Self {
            db: Arc::new(db),
            sale_ids: Arc::new(Mutex::new(())),
        })
    }

    fn cf(&self, name: &str) -> Result<&rocksdb::ColumnFamily> {
        self.db.cf_handle(name).ok_or_else(|| {
            StoreError::PersistenceError(format!("{name} column family not found"))
        })
    }

    fn next_sale_id(&self) -> Result<SaleId> {
        let cf = self.cf(CF_SALES)?;
        let last = self.db.iterator_cf(cf, IteratorMode::End).next();
        match last {
            None => Ok(SaleId(1)),
            Some(item) => {
                let (key, _) = item?;
                let bytes: [u8; 8] = key.as_ref().try_into().map_err(|_| {
                    StoreError::PersistenceError("malformed sale key".to_string())
                })?;
                Ok(SaleId(u64::from_be_bytes(bytes) + 1))
            }
        }
    }

    fn decode_all<T: serde::de::DeserializeOwned>(&self, cf_name: &str) -> Result<Vec<T>> {
        let cf = self.cf(cf_name)?;
        let mut values = Vec::new();
        for item in self.db.iterator_cf(cf, IteratorMode::Start) {
            let (_key, value) = item?;
            values.push(serde_json::from_slice(&value)?);
        }
        Ok(values)
    }
}

#[async_trait]
impl SalesStore for RocksDBStore {
    async fn insert_sale(&self, sale: NewSale) -> Result<SaleRecord> {
        let _ids = self.sale_ids.lock().await;
        let id = self.next_sale_id()?;
        let record = sale.into_record(id, Utc::now());

        let value = serde_json::to_vec(&record)?;
        self.db.put_cf(self.cf(CF_SALES)?, id.0.to_be_bytes(), value)?;

        Ok(record)
    }

    async fn list_sales(&self) -> Result<Vec<SaleRecord>> {
        let mut sales: Vec<SaleRecord> = self.decode_all(CF_SALES)?;
        newest_first(&mut sales);
        Ok(sales)
    }
}

#[async_trait]
impl CatalogStore for RocksDBStore {
    async fn insert_product(&self, product: CatalogItem) -> Result<()> {
        let value = serde_json::to_vec(&product)?;
        self.db
            .put_cf(self.cf(CF_PRODUCTS)?, product.id.0.to_be_bytes(), value)?;
        Ok(())
    }

    async fn list_products(&self, filter: CategoryFilter) -> Result<Vec<CatalogItem>> {
        let mut products: Vec<CatalogItem> = self.decode_all(CF_PRODUCTS)?;
        products.retain(|p| filter.matches(p.category));
        products.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id)));
        Ok(products)
    }
}
