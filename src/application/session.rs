use super::cart_store::CartStore;
use uuid::Uuid;

/// One shopper's visit. Owns the cart for as long as the session lives.
#[derive(Debug, Clone)]
pub struct Session {
    id: Uuid,
    cart: CartStore,
}

impl Session {
    pub fn new() -> Self {
        let id = Uuid::new_v4();
        tracing::debug!(session = %id, "session opened");
        Self {
            id,
            cart: CartStore::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn cart(&self) -> &CartStore {
        &self.cart
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::{CatalogItem, Category, ProductId};
    use crate::domain::money::Money;

    #[tokio::test]
    async fn test_sessions_do_not_share_carts() {
        let first = Session::new();
        let second = Session::new();
        assert_ne!(first.id(), second.id());

        let product =
            CatalogItem::new(ProductId(1), "Soap", Money::ZERO, Category::PersonalCare).unwrap();
        first.cart().add_item(&product).await;

        assert_eq!(first.cart().len().await, 1);
        assert!(second.cart().is_empty().await);
    }
}
