//! `orderdesk-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives shared by every other
//! crate: typed identifiers, the order-id sequence, and the domain error
//! model. No storage concerns.

pub mod error;
pub mod id;

pub use error::{DomainError, DomainResult};
pub use id::{CustomerId, ItemCode, OrderId};
