//! Application layer: the per-session cart and the checkout protocol.
//!
//! A `Session` owns a `CartStore`. The `CheckoutCoordinator` reads a snapshot of
//! that cart, records the sale through the `SalesStore` port, relays a summary
//! through the `Notifier` port, and settles the cart.

pub mod cart_store;
pub mod checkout;
pub mod receipt;
pub mod session;
