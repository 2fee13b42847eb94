use super::cart_store::{CartSnapshot, CartStore, CheckoutGuard, CheckoutState};
use super::receipt::order_summary;
use crate::config::CheckoutConfig;
use crate::domain::ports::{NotifierRef, SalesStoreRef};
use crate::domain::sale::{NewSale, SaleRecord};
use crate::error::{Result, StoreError};
use std::sync::Arc;
use tokio::task::JoinHandle;

/// What a successful checkout hands back.
#[derive(Debug)]
pub struct CheckoutReceipt {
    /// The sale as persisted, with the id and timestamp the store assigned.
    pub sale: SaleRecord,
    /// The detached notification task, if one was started. Checkout does not
    /// wait for it; callers may.
    pub handoff: Option<JoinHandle<()>>,
}

/// Drives checkout attempts from a session cart to a recorded sale.
///
/// Each attempt goes `Validating -> Submitting -> NotifyPending -> Completed`, or
/// ends early in `Failed`. The cart is cleared only on `Completed`, and only after
/// the sales store has confirmed the write.
pub struct CheckoutCoordinator {
    sales: SalesStoreRef,
    notifier: Option<NotifierRef>,
    config: CheckoutConfig,
}

impl CheckoutCoordinator {
    /// Creates a coordinator that persists into `sales`.
    ///
    /// # Arguments
    ///
    /// * `sales` - The sales ledger.
    /// * `config` - Checkout settings, including the notification destination.
    pub fn new(sales: SalesStoreRef, config: CheckoutConfig) -> Self {
        Self {
            sales,
            notifier: None,
            config,
        }
    }

    pub fn with_notifier(mut self, notifier: NotifierRef) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Checks out everything in `cart` for `customer_name`.
    ///
    /// Fails with `CheckoutInProgress` if this cart already has an attempt in
    /// flight, with `ValidationError` for a blank name or an empty cart, and with
    /// `PersistenceError` if the store rejects the sale. In every failure case the
    /// cart is left as it was.
    #[tracing::instrument(skip(self, cart, customer_name), fields(customer = %customer_name.trim()))]
    pub async fn checkout(&self, cart: &CartStore, customer_name: &str) -> Result<CheckoutReceipt> {
        let guard = cart.try_begin_checkout().ok_or_else(|| {
            tracing::warn!(state = %cart.checkout_state(), "checkout rejected, another attempt is in flight");
            StoreError::CheckoutInProgress
        })?;

        let customer = customer_name.trim();
        if customer.is_empty() {
            return Err(StoreError::ValidationError(
                "Customer name must not be empty".to_string(),
            ));
        }

        let snapshot = cart.snapshot().await;
        if snapshot.is_empty() {
            return Err(StoreError::ValidationError("Cart is empty".to_string()));
        }

        guard.advance(CheckoutState::Submitting);
        let attempt = Submission {
            sale: NewSale::new(snapshot.items().to_vec(), customer),
            snapshot,
            cart: cart.clone(),
            sales: Arc::clone(&self.sales),
            notifier: self.notifier.clone(),
            destination: self.config.notify_to.clone(),
            guard,
        };

        // From here on the attempt runs on its own task, so dropping this future
        // cannot leave a sale half-written.
        tokio::spawn(attempt.run())
            .await
            .map_err(|e| StoreError::InternalError(Box::new(e)))?
    }
}

/// Everything a checkout needs once validation has passed.
struct Submission {
    sale: NewSale,
    snapshot: CartSnapshot,
    cart: CartStore,
    sales: SalesStoreRef,
    notifier: Option<NotifierRef>,
    destination: Option<String>,
    guard: CheckoutGuard,
}

impl Submission {
    async fn run(self) -> Result<CheckoutReceipt> {
        let total = self.sale.total();
        let record = match self.sales.insert_sale(self.sale).await {
            Ok(record) => record,
            Err(err) => {
                self.guard.advance(CheckoutState::Failed);
                tracing::error!(error = %err, %total, "sale could not be recorded, cart kept");
                return Err(if matches!(err, StoreError::PersistenceError(_)) {
                    err
                } else {
                    StoreError::PersistenceError(err.to_string())
                });
            }
        };
        tracing::info!(sale = %record.id, total = %record.total, "sale recorded");

        self.guard.advance(CheckoutState::NotifyPending);
        let handoff = match (self.notifier, self.destination) {
            (Some(notifier), Some(destination)) => {
                Some(spawn_handoff(notifier, destination, &record))
            }
            _ => None,
        };

        self.cart.settle(&self.snapshot).await;
        self.guard.advance(CheckoutState::Completed);

        Ok(CheckoutReceipt {
            sale: record,
            handoff,
        })
    }
}

fn spawn_handoff(notifier: NotifierRef, destination: String, sale: &SaleRecord) -> JoinHandle<()> {
    let message = order_summary(sale);
    let sale_id = sale.id;
    tokio::spawn(async move {
        match notifier.notify(&destination, &message).await {
            Ok(()) => tracing::debug!(sale = %sale_id, "order notification handed off"),
            Err(err) => {
                tracing::warn!(sale = %sale_id, error = %err, "order notification failed")
            }
        }
    })
}
