use std::collections::HashSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use orderdesk_core::{CustomerId, DomainError, DomainResult, ItemCode, OrderId};

/// Order header row: identity, date, customer reference.
///
/// The customer reference is stored as supplied; the order core passes it
/// through without checking the customer directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderHeader {
    pub id: OrderId,
    pub order_date: NaiveDate,
    pub customer_id: CustomerId,
}

/// One stored order line. Identity is `(order id, item code)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    pub order_id: OrderId,
    pub item_code: ItemCode,
    pub quantity: i64,
    pub discount_pct: f64,
}

/// A line of a not-yet-placed order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftLine {
    item_code: ItemCode,
    quantity: i64,
    discount_pct: f64,
}

impl DraftLine {
    pub fn new(item_code: ItemCode, quantity: i64, discount_pct: f64) -> DomainResult<Self> {
        if quantity < 1 {
            return Err(DomainError::validation(
                "order line quantity must be at least 1",
            ));
        }
        if !(0.0..=100.0).contains(&discount_pct) {
            return Err(DomainError::validation(
                "discount must be between 0 and 100 percent",
            ));
        }
        Ok(Self {
            item_code,
            quantity,
            discount_pct,
        })
    }

    pub fn item_code(&self) -> &ItemCode {
        &self.item_code
    }

    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    pub fn discount_pct(&self) -> f64 {
        self.discount_pct
    }
}

/// A candidate order as submitted by the caller.
///
/// Construction is the validation seam: a draft always carries at least one
/// line and no two lines for the same item, so storage never sees an empty
/// order or a duplicate `(order id, item code)` key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderDraft {
    header: OrderHeader,
    lines: Vec<DraftLine>,
}

impl OrderDraft {
    pub fn new(header: OrderHeader, lines: Vec<DraftLine>) -> DomainResult<Self> {
        if lines.is_empty() {
            return Err(DomainError::invariant(
                "an order must have at least one line",
            ));
        }
        {
            let mut seen = HashSet::with_capacity(lines.len());
            for line in &lines {
                if !seen.insert(line.item_code().as_str()) {
                    return Err(DomainError::validation(format!(
                        "duplicate line for item {}",
                        line.item_code()
                    )));
                }
            }
        }
        Ok(Self { header, lines })
    }

    pub fn header(&self) -> &OrderHeader {
        &self.header
    }

    pub fn lines(&self) -> &[DraftLine] {
        &self.lines
    }
}
