use super::catalog::{CatalogItem, ProductId};
use super::money::{Money, Quantity};
use serde::{Deserialize, Serialize};

/// One product and how many units of it are in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub id: ProductId,
    pub name: String,
    pub unit_price: Money,
    pub quantity: Quantity,
}

impl LineItem {
    pub fn new(id: ProductId, name: impl Into<String>, unit_price: Money, quantity: Quantity) -> Self {
        Self {
            id,
            name: name.into(),
            unit_price,
            quantity,
        }
    }

    pub fn line_total(&self) -> Money {
        self.unit_price * self.quantity
    }
}

/// The lines a customer has picked, unique by product id, in the order they
/// were first added.
///
/// The total is never stored; every read recomputes it from the lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    items: Vec<LineItem>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one unit of `product`, merging into its existing line if present.
    pub fn add_item(&mut self, product: &CatalogItem) {
        match self.items.iter_mut().find(|line| line.id == product.id) {
            Some(line) => line.quantity = line.quantity.incremented(),
            None => self.items.push(LineItem::new(
                product.id,
                product.name.clone(),
                product.price,
                Quantity::ONE,
            )),
        }
    }

    /// Drops the line for `id`. Unknown ids are ignored.
    pub fn remove_item(&mut self, id: ProductId) {
        self.items.retain(|line| line.id != id);
    }

    /// Takes `quantity` units off the line for `id`, dropping it when none are left.
    pub fn deduct(&mut self, id: ProductId, quantity: Quantity) {
        let Some(pos) = self.items.iter().position(|line| line.id == id) else {
            return;
        };
        let line = &mut self.items[pos];
        match line.quantity.checked_sub(quantity) {
            Some(rest) => line.quantity = rest,
            None => {
                self.items.remove(pos);
            }
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn total(&self) -> Money {
        self.items.iter().map(LineItem::line_total).sum()
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn get(&self, id: ProductId) -> Option<&LineItem> {
        self.items.iter().find(|line| line.id == id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Units across all lines.
    pub fn unit_count(&self) -> u64 {
        self.items
            .iter()
            .map(|line| u64::from(line.quantity.get()))
            .sum()
    }
}
