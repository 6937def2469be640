//! Catalog item carrying the shared stock counter.

use orderdesk_core::{DomainError, DomainResult, ItemCode};
use serde::{Deserialize, Serialize};

/// A catalog item and its current stock level.
///
/// `qty_on_hand` never goes negative. The stock ledger only moves it through
/// a conditional decrement, and storage backs the rule with a CHECK
/// constraint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub code: ItemCode,
    pub description: String,
    pub pack_size: String,
    pub unit_price: f64,
    pub qty_on_hand: i64,
}

impl Item {
    pub fn new(
        code: ItemCode,
        description: impl Into<String>,
        pack_size: impl Into<String>,
        unit_price: f64,
        qty_on_hand: i64,
    ) -> DomainResult<Self> {
        if !unit_price.is_finite() || unit_price < 0.0 {
            return Err(DomainError::validation(
                "unit price must be a non-negative number",
            ));
        }
        if qty_on_hand < 0 {
            return Err(DomainError::validation(
                "quantity on hand must not be negative",
            ));
        }
        Ok(Self {
            code,
            description: description.into(),
            pack_size: pack_size.into(),
            unit_price,
            qty_on_hand,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_code() -> ItemCode {
        ItemCode::new("P001").unwrap()
    }

    #[test]
    fn accepts_zero_stock_and_zero_price() {
        let item = Item::new(test_code(), "Washer 10mm", "100 units", 0.0, 0).unwrap();
        assert_eq!(item.qty_on_hand, 0);
        assert_eq!(item.unit_price, 0.0);
    }

    #[test]
    fn rejects_negative_unit_price() {
        let err = Item::new(test_code(), "Washer 10mm", "100 units", -0.5, 10).unwrap_err();
        match err {
            DomainError::Validation(msg) if msg.contains("unit price") => {}
            _ => panic!("Expected validation error for negative unit price"),
        }
    }

    #[test]
    fn rejects_non_finite_unit_price() {
        assert!(Item::new(test_code(), "Washer 10mm", "100 units", f64::NAN, 10).is_err());
        assert!(Item::new(test_code(), "Washer 10mm", "100 units", f64::INFINITY, 10).is_err());
    }

    #[test]
    fn rejects_negative_quantity_on_hand() {
        let err = Item::new(test_code(), "Washer 10mm", "100 units", 1.25, -1).unwrap_err();
        match err {
            DomainError::Validation(msg) if msg.contains("quantity on hand") => {}
            _ => panic!("Expected validation error for negative quantity"),
        }
    }
}
