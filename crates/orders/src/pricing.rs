//! Order money math.
//!
//! Totals are computed in full `f64` precision and rounded only at
//! presentation time, never mid-computation.

use serde::{Deserialize, Serialize};

use orderdesk_core::ItemCode;

/// Total for one line: `quantity * unit_price * (1 - discount/100)`.
pub fn line_total(quantity: i64, unit_price: f64, discount_pct: f64) -> f64 {
    quantity as f64 * unit_price * (1.0 - discount_pct / 100.0)
}

/// Total for a whole order: the sum of its line totals.
pub fn order_total(lines: &[PricedLine]) -> f64 {
    lines.iter().map(PricedLine::line_total).sum()
}

/// An order line joined with the item's description and unit price, as read
/// back for display and total computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricedLine {
    pub item_code: ItemCode,
    pub description: String,
    pub quantity: i64,
    pub unit_price: f64,
    pub discount_pct: f64,
}

impl PricedLine {
    /// Total for this line. Depends only on quantity, unit price, and
    /// discount; `description` is display-only.
    pub fn line_total(&self) -> f64 {
        line_total(self.quantity, self.unit_price, self.discount_pct)
    }
}
