mod common;

use async_trait::async_trait;
use common::product;
use omnistore::application::cart_store::{CartStore, CheckoutState};
use omnistore::application::checkout::CheckoutCoordinator;
use omnistore::config::CheckoutConfig;
use omnistore::domain::catalog::ProductId;
use omnistore::domain::ports::SalesStore;
use omnistore::domain::sale::{NewSale, SaleRecord};
use omnistore::error::{Result, StoreError};
use omnistore::infrastructure::in_memory::{InMemoryNotifier, InMemorySalesStore};
use rust_decimal_macros::dec;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;

/// Holds every insert until the test releases it.
#[derive(Default)]
struct GatedSalesStore {
    inner: InMemorySalesStore,
    entered: Notify,
    release: Notify,
}

#[async_trait]
impl SalesStore for GatedSalesStore {
    async fn insert_sale(&self, sale: NewSale) -> Result<SaleRecord> {
        self.entered.notify_one();
        self.release.notified().await;
        self.inner.insert_sale(sale).await
    }

    async fn list_sales(&self) -> Result<Vec<SaleRecord>> {
        self.inner.list_sales().await
    }
}

async fn jane_cart() -> CartStore {
    let cart = CartStore::new();
    let a = product(1, "A", dec!(2.50));
    let b = product(2, "B", dec!(1.00));
    for _ in 0..2 {
        cart.add_item(&a).await;
    }
    for _ in 0..3 {
        cart.add_item(&b).await;
    }
    cart
}

#[tokio::test]
async fn test_checkout_records_exact_cart_contents() {
    let store = Arc::new(InMemorySalesStore::new());
    let coordinator = CheckoutCoordinator::new(store.clone(), CheckoutConfig::default());
    let cart = jane_cart().await;
    let expected_items = cart.items().await;

    let receipt = coordinator.checkout(&cart, "Jane").await.unwrap();

    assert_eq!(receipt.sale.total.value(), dec!(8.00));
    assert_eq!(receipt.sale.items, expected_items);
    assert_eq!(receipt.sale.customer_name, "Jane");
    assert!(cart.is_empty().await);

    let sales = store.list_sales().await.unwrap();
    assert_eq!(sales, vec![receipt.sale]);
}

#[tokio::test]
async fn test_persistence_failure_leaves_cart_untouched() {
    let store = Arc::new(InMemorySalesStore::new());
    store.set_fail_on_insert(true);
    let coordinator = CheckoutCoordinator::new(store.clone(), CheckoutConfig::default());
    let cart = jane_cart().await;
    let before = cart.items().await;

    let result = coordinator.checkout(&cart, "Jane").await;

    assert!(matches!(result, Err(StoreError::PersistenceError(_))));
    assert_eq!(cart.items().await, before);
    assert_eq!(cart.total().await.value(), dec!(8.00));
    assert_eq!(cart.checkout_state(), CheckoutState::Idle);
}

#[tokio::test]
async fn test_empty_cart_never_reaches_the_store() {
    let store = Arc::new(InMemorySalesStore::new());
    let coordinator = CheckoutCoordinator::new(store.clone(), CheckoutConfig::default());
    let cart = CartStore::new();

    let result = coordinator.checkout(&cart, "Jane").await;

    assert!(matches!(result, Err(StoreError::ValidationError(_))));
    assert_eq!(store.insert_calls(), 0);
    assert_eq!(cart.checkout_state(), CheckoutState::Idle);
}

#[tokio::test]
async fn test_second_checkout_while_submitting_is_rejected() {
    let store = Arc::new(GatedSalesStore::default());
    let coordinator = Arc::new(CheckoutCoordinator::new(
        store.clone(),
        CheckoutConfig::default(),
    ));
    let cart = jane_cart().await;

    let first = tokio::spawn({
        let coordinator = coordinator.clone();
        let cart = cart.clone();
        async move { coordinator.checkout(&cart, "Jane").await }
    });
    store.entered.notified().await;
    assert_eq!(cart.checkout_state(), CheckoutState::Submitting);

    let second = coordinator.checkout(&cart, "Jane").await;
    assert!(matches!(second, Err(StoreError::CheckoutInProgress)));

    store.release.notify_one();
    let receipt = first.await.unwrap().unwrap();
    assert_eq!(receipt.sale.total.value(), dec!(8.00));

    assert_eq!(store.list_sales().await.unwrap().len(), 1);
    assert_eq!(store.inner.insert_calls(), 1);
    assert!(cart.is_empty().await);
}

#[tokio::test]
async fn test_items_added_mid_flight_are_not_charged() {
    let store = Arc::new(GatedSalesStore::default());
    let coordinator = Arc::new(CheckoutCoordinator::new(
        store.clone(),
        CheckoutConfig::default(),
    ));
    let cart = jane_cart().await;

    let attempt = tokio::spawn({
        let coordinator = coordinator.clone();
        let cart = cart.clone();
        async move { coordinator.checkout(&cart, "Jane").await }
    });
    store.entered.notified().await;

    cart.add_item(&product(3, "C", dec!(4.00))).await;
    store.release.notify_one();

    let receipt = attempt.await.unwrap().unwrap();
    assert_eq!(receipt.sale.total.value(), dec!(8.00));
    assert_eq!(receipt.sale.items.len(), 2);

    let left = cart.items().await;
    assert_eq!(left.len(), 1);
    assert_eq!(left[0].id, ProductId(3));
    assert_eq!(cart.total().await.value(), dec!(4.00));
}

#[tokio::test]
async fn test_product_re_added_mid_flight_survives() {
    let store = Arc::new(GatedSalesStore::default());
    let coordinator = Arc::new(CheckoutCoordinator::new(
        store.clone(),
        CheckoutConfig::default(),
    ));
    let cart = CartStore::new();
    let a = product(1, "A", dec!(2.50));
    cart.add_item(&a).await;

    let attempt = tokio::spawn({
        let coordinator = coordinator.clone();
        let cart = cart.clone();
        async move { coordinator.checkout(&cart, "Jane").await }
    });
    store.entered.notified().await;

    cart.remove_item(ProductId(1)).await;
    cart.add_item(&a).await;
    store.release.notify_one();

    let receipt = attempt.await.unwrap().unwrap();
    assert_eq!(receipt.sale.total.value(), dec!(2.50));

    let left = cart.items().await;
    assert_eq!(left.len(), 1);
    assert_eq!(left[0].id, ProductId(1));
    assert_eq!(left[0].quantity.get(), 1);
}

#[tokio::test]
async fn test_dropping_the_caller_does_not_cancel_submission() {
    let store = Arc::new(GatedSalesStore::default());
    let coordinator = Arc::new(CheckoutCoordinator::new(
        store.clone(),
        CheckoutConfig::default(),
    ));
    let cart = jane_cart().await;

    let attempt = tokio::spawn({
        let coordinator = coordinator.clone();
        let cart = cart.clone();
        async move { coordinator.checkout(&cart, "Jane").await }
    });
    store.entered.notified().await;
    attempt.abort();
    store.release.notify_one();

    for _ in 0..100 {
        if cart.is_empty().await {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    assert!(cart.is_empty().await);
    assert_eq!(store.list_sales().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_handoff_failure_does_not_affect_checkout() {
    let store = Arc::new(InMemorySalesStore::new());
    let notifier = Arc::new(InMemoryNotifier::new());
    notifier.set_fail(true);
    let coordinator = CheckoutCoordinator::new(store.clone(), CheckoutConfig::with_notify_to("123"))
        .with_notifier(notifier.clone());
    let cart = jane_cart().await;

    let receipt = coordinator.checkout(&cart, "Jane").await.unwrap();
    receipt.handoff.unwrap().await.unwrap();

    assert!(notifier.sent().await.is_empty());
    assert!(cart.is_empty().await);
    assert_eq!(store.list_sales().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_retry_after_failure_is_a_fresh_attempt() {
    let store = Arc::new(InMemorySalesStore::new());
    let coordinator = CheckoutCoordinator::new(store.clone(), CheckoutConfig::default());
    let cart = jane_cart().await;

    store.set_fail_on_insert(true);
    let err = coordinator.checkout(&cart, "Jane").await.unwrap_err();
    assert!(err.is_retryable());
    // no automatic retry happened
    assert_eq!(store.insert_calls(), 1);

    store.set_fail_on_insert(false);
    coordinator.checkout(&cart, "Jane").await.unwrap();
    assert_eq!(store.insert_calls(), 2);
    assert_eq!(store.list_sales().await.unwrap().len(), 1);
}
