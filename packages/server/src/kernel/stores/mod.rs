//! `BaseVendorStore` implementations.
//!
//! - `PostgresStore` - production store backed by the model queries
//! - `MemoryStore` - in-memory store for tests and local runs without a database

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PostgresStore;
