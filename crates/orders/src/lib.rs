//! `orderdesk-orders` — order records, draft validation, and pricing.
//!
//! An [`OrderDraft`] is the only thing callers can hand to the transaction
//! manager, so every order that reaches storage already has at least one
//! line, positive quantities, and discounts within range.

pub mod order;
pub mod pricing;

pub use order::{DraftLine, OrderDraft, OrderHeader, OrderLine};
pub use pricing::PricedLine;
