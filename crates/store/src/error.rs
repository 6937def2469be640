//! Storage-layer error taxonomy.
//!
//! SQLx errors are mapped to `StoreError` as follows:
//!
//! | SQLx Error | SQLite extended code | StoreError | Scenario |
//! |------------|---------------------|------------|----------|
//! | Database (primary key violation) | `1555` | `DuplicateOrder` / `DuplicateItem` / `DuplicateCustomer` | Insert with an id that already exists |
//! | Database (unique violation) | `2067` | same as above | Same, through a UNIQUE index |
//! | anything else | any | `Storage` | Connectivity, CHECK constraint faults, etc. |
//!
//! `InsufficientStock` and `ItemNotFound` are not SQLx mappings: the stock
//! ledger derives them from a conditional update that affected zero rows.

use orderdesk_core::{CustomerId, DomainError, ItemCode, OrderId};
use thiserror::Error;

/// Result type for every storage operation.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors surfaced by the store crate.
///
/// The first three variants are the recoverable business failures the
/// transaction manager reports verbatim; each one aborts (and rolls back)
/// the unit of work that produced it. An order/line that does not exist is
/// not an error — those operations return `Ok(false)` instead.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reservation asked for more stock than the item has.
    #[error("insufficient stock for item {item_code}: available {available}, requested {requested}")]
    InsufficientStock {
        item_code: ItemCode,
        available: i64,
        requested: i64,
    },

    /// The item code does not exist in the catalog.
    #[error("item not found: {item_code}")]
    ItemNotFound { item_code: ItemCode },

    /// An order with this id is already persisted.
    #[error("order already exists: {order_id}")]
    DuplicateOrder { order_id: OrderId },

    /// An item with this code is already persisted.
    #[error("item already exists: {item_code}")]
    DuplicateItem { item_code: ItemCode },

    /// A customer with this id is already persisted.
    #[error("customer already exists: {customer_id}")]
    DuplicateCustomer { customer_id: CustomerId },

    /// Invalid input reached the storage layer (e.g. a zero quantity).
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Could not resolve the database location or configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// Connectivity or constraint fault; the current unit of work has been
    /// rolled back and the core does not retry.
    #[error("storage error: {0}")]
    Storage(#[from] sqlx::Error),
}

/// True when the error is a SQLite primary-key/unique violation.
///
/// SQLite reports these as extended result codes 1555
/// (`SQLITE_CONSTRAINT_PRIMARYKEY`) and 2067 (`SQLITE_CONSTRAINT_UNIQUE`).
pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    if let sqlx::Error::Database(db_err) = err {
        if let Some(code) = db_err.code() {
            return code.as_ref() == "1555" || code.as_ref() == "2067";
        }
    }
    false
}
