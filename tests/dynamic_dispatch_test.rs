mod common;

use common::product;
use omnistore::domain::cart::LineItem;
use omnistore::domain::catalog::CategoryFilter;
use omnistore::domain::money::Quantity;
use omnistore::domain::ports::{
    CatalogStore, CatalogStoreBox, Notifier, NotifierRef, SalesStore, SalesStoreRef,
};
use omnistore::domain::sale::NewSale;
use omnistore::infrastructure::deep_link::DeepLinkNotifier;
use omnistore::infrastructure::in_memory::{InMemoryCatalogStore, InMemorySalesStore};
use rust_decimal_macros::dec;
use std::sync::Arc;

#[tokio::test]
async fn test_ports_as_trait_objects() {
    let sales: SalesStoreRef = Arc::new(InMemorySalesStore::new());
    let catalog: CatalogStoreBox = Box::new(InMemoryCatalogStore::new());
    let notifier: NotifierRef = Arc::new(DeepLinkNotifier::default());

    let rice = product(1, "Rice", dec!(1.20));
    let sale = NewSale::new(
        vec![LineItem::new(rice.id, rice.name.clone(), rice.price, Quantity::ONE)],
        "Ana",
    );

    // Verify Send + Sync by spawning tasks
    let sales_handle = tokio::spawn(async move {
        sales.insert_sale(sale).await.unwrap();
        sales.list_sales().await.unwrap()
    });

    let catalog_handle = tokio::spawn(async move {
        catalog.insert_product(rice).await.unwrap();
        catalog.list_products(CategoryFilter::All).await.unwrap()
    });

    let notify_handle = tokio::spawn(async move { notifier.notify("123", "hi").await });

    let recorded = sales_handle.await.unwrap();
    assert_eq!(recorded.len(), 1);
    assert_eq!(recorded[0].customer_name, "Ana");

    let listed = catalog_handle.await.unwrap();
    assert_eq!(listed.len(), 1);

    assert!(notify_handle.await.unwrap().is_ok());
}
