//! `orderdesk-inventory` — the stock item catalog domain.

pub mod item;

pub use item::Item;
