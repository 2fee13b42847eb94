//! Domain types for the storefront: money, catalog, cart and sales, plus the
//! ports the application layer talks to.

pub mod cart;
pub mod catalog;
pub mod money;
pub mod ports;
pub mod sale;
