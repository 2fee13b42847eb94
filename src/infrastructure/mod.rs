//! Adapters behind the domain ports.

pub mod deep_link;
pub mod in_memory;
#[cfg(feature = "storage-rocksdb")]
pub mod rocksdb;
