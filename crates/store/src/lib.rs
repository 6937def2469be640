//! `orderdesk-store` — SQLite persistence and the order transaction core.
//!
//! Layout mirrors the data it owns:
//!
//! - [`db`] builds connection pools and applies the schema.
//! - [`stock_ledger`] and [`order_repository`] are connection-scoped
//!   operations, composable inside one transaction.
//! - [`OrderTransactionManager`] is the only writer that touches orders and
//!   stock in the same unit of work.
//! - [`ItemCatalog`] and [`CustomerDirectory`] are the plain CRUD
//!   collaborators around the core.

pub mod customer_directory;
pub mod db;
pub mod error;
pub mod item_catalog;
pub mod order_repository;
pub mod stock_ledger;
pub mod transaction_manager;


pub use customer_directory::CustomerDirectory;
pub use error::{StoreError, StoreResult};
pub use item_catalog::ItemCatalog;
pub use transaction_manager::OrderTransactionManager;
