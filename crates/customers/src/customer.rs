//! Customer record as stored by the directory.

use chrono::NaiveDate;
use orderdesk_core::{CustomerId, DomainError, DomainResult};
use serde::{Deserialize, Serialize};

/// A customer in the directory.
///
/// Orders reference customers by id only; nothing in the order core reads
/// these attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub title: String,
    pub name: String,
    pub date_of_birth: NaiveDate,
    pub salary: f64,
    pub address: String,
    pub city: String,
    pub province: String,
    pub postal_code: String,
}

impl Customer {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: CustomerId,
        title: impl Into<String>,
        name: impl Into<String>,
        date_of_birth: NaiveDate,
        salary: f64,
        address: impl Into<String>,
        city: impl Into<String>,
        province: impl Into<String>,
        postal_code: impl Into<String>,
    ) -> DomainResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::validation("customer name must not be blank"));
        }
        if !salary.is_finite() || salary < 0.0 {
            return Err(DomainError::validation(
                "salary must be a non-negative number",
            ));
        }
        Ok(Self {
            id,
            title: title.into(),
            name,
            date_of_birth,
            salary,
            address: address.into(),
            city: city.into(),
            province: province.into(),
            postal_code: postal_code.into(),
        })
    }
}
