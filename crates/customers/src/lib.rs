//! `orderdesk-customers` — the customer directory domain.

pub mod customer;

pub use customer::Customer;
