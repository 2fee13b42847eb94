use crate::domain::cart::{Cart, LineItem};
use crate::domain::catalog::{CatalogItem, ProductId};
use crate::domain::money::Money;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};
use tokio::sync::RwLock;

/// Where a session's checkout attempt currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum CheckoutState {
    Idle = 0,
    Validating = 1,
    Submitting = 2,
    NotifyPending = 3,
    Completed = 4,
    Failed = 5,
}

impl CheckoutState {
    fn from_u8(raw: u8) -> Self {
        match raw {
            1 => Self::Validating,
            2 => Self::Submitting,
            3 => Self::NotifyPending,
            4 => Self::Completed,
            5 => Self::Failed,
            _ => Self::Idle,
        }
    }
}

impl fmt::Display for CheckoutState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Validating => "validating",
            Self::Submitting => "submitting",
            Self::NotifyPending => "notify_pending",
            Self::Completed => "completed",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Default)]
struct CartState {
    cart: Cart,
    /// Bumped on every effective mutation.
    revision: u64,
    /// Revision at which each current line was created.
    line_origin: HashMap<ProductId, u64>,
}

impl CartState {
    fn bump(&mut self) -> u64 {
        self.revision += 1;
        self.revision
    }
}

/// A frozen copy of the cart taken at one instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartSnapshot {
    items: Vec<LineItem>,
    revision: u64,
}

impl CartSnapshot {
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn into_items(self) -> Vec<LineItem> {
        self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn total(&self) -> Money {
        self.items.iter().map(LineItem::line_total).sum()
    }
}

/// Shared handle to one session's cart.
///
/// Clones point at the same cart. Reads and writes go through a `tokio` `RwLock`,
/// so a snapshot never observes a half-applied mutation. The handle also owns the
/// session's single checkout slot.
#[derive(Debug, Clone, Default)]
pub struct CartStore {
    state: Arc<RwLock<CartState>>,
    checkout: Arc<AtomicU8>,
}

impl CartStore {
    /// Creates a new, empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_item(&self, product: &CatalogItem) {
        let mut state = self.state.write().await;
        let is_new_line = state.cart.get(product.id).is_none();
        state.cart.add_item(product);
        let revision = state.bump();
        if is_new_line {
            state.line_origin.insert(product.id, revision);
        }
        tracing::debug!(product = %product.id, revision, "item added to cart");
    }

    pub async fn remove_item(&self, id: ProductId) {
        let mut state = self.state.write().await;
        let before = state.cart.len();
        state.cart.remove_item(id);
        if state.cart.len() != before {
            state.line_origin.remove(&id);
            state.bump();
            tracing::debug!(product = %id, revision = state.revision, "item removed from cart");
        }
    }

    pub async fn clear(&self) {
        let mut state = self.state.write().await;
        state.cart.clear();
        state.line_origin.clear();
        state.bump();
    }

    pub async fn total(&self) -> Money {
        self.state.read().await.cart.total()
    }

    pub async fn items(&self) -> Vec<LineItem> {
        self.state.read().await.cart.items().to_vec()
    }

    pub async fn len(&self) -> usize {
        self.state.read().await.cart.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.state.read().await.cart.is_empty()
    }

    pub async fn unit_count(&self) -> u64 {
        self.state.read().await.cart.unit_count()
    }

    /// Copies the current lines under the lock.
    pub async fn snapshot(&self) -> CartSnapshot {
        let state = self.state.read().await;
        CartSnapshot {
            items: state.cart.items().to_vec(),
            revision: state.revision,
        }
    }

    /// Removes what `snapshot` charged.
    ///
    /// An unchanged cart is simply cleared. If the cart changed after the
    /// snapshot, only the charged quantities come off lines that already existed
    /// when it was taken. Lines created later, including a product removed and
    /// added back, were never charged and stay whole.
    pub async fn settle(&self, snapshot: &CartSnapshot) {
        let mut state = self.state.write().await;
        if state.revision == snapshot.revision {
            state.cart.clear();
            state.line_origin.clear();
        } else {
            tracing::info!(
                snapshot_revision = snapshot.revision,
                current_revision = state.revision,
                "cart changed during checkout, keeping uncharged items"
            );
            for line in &snapshot.items {
                let charged_line_survives = state
                    .line_origin
                    .get(&line.id)
                    .is_some_and(|origin| *origin <= snapshot.revision);
                if !charged_line_survives {
                    continue;
                }
                state.cart.deduct(line.id, line.quantity);
                if state.cart.get(line.id).is_none() {
                    state.line_origin.remove(&line.id);
                }
            }
        }
        state.bump();
    }

    /// Claims the checkout slot, or `None` if an attempt is already running.
    pub fn try_begin_checkout(&self) -> Option<CheckoutGuard> {
        self.checkout
            .compare_exchange(
                CheckoutState::Idle as u8,
                CheckoutState::Validating as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .ok()
            .map(|_| CheckoutGuard {
                slot: Arc::clone(&self.checkout),
            })
    }

    pub fn checkout_state(&self) -> CheckoutState {
        CheckoutState::from_u8(self.checkout.load(Ordering::Acquire))
    }
}

/// Exclusive hold on a session's checkout slot. Dropping it returns the slot to
/// `Idle`.
#[derive(Debug)]
pub struct CheckoutGuard {
    slot: Arc<AtomicU8>,
}

impl CheckoutGuard {
    pub fn advance(&self, state: CheckoutState) {
        self.slot.store(state as u8, Ordering::Release);
    }

    pub fn state(&self) -> CheckoutState {
        CheckoutState::from_u8(self.slot.load(Ordering::Acquire))
    }
}

impl Drop for CheckoutGuard {
    fn drop(&mut self) {
        self.slot.store(CheckoutState::Idle as u8, Ordering::Release);
    }
}
