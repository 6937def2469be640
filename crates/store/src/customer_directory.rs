//! Customer directory CRUD.

use chrono::NaiveDate;
use sqlx::{Row, SqlitePool};
use tracing::instrument;

use orderdesk_core::CustomerId;
use orderdesk_customers::Customer;

use crate::error::{StoreError, StoreResult, is_unique_violation};

#[derive(Debug, Clone)]
pub struct CustomerDirectory {
    pool: SqlitePool,
}

impl CustomerDirectory {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    #[instrument(skip(self, customer), fields(customer_id = %customer.id), err)]
    pub async fn save(&self, customer: &Customer) -> StoreResult<()> {
        sqlx::query(
            "INSERT INTO customers \
             (customer_id, title, name, date_of_birth, salary, address, city, province, postal_code) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        )
        .bind(customer.id.as_str())
        .bind(&customer.title)
        .bind(&customer.name)
        .bind(customer.date_of_birth)
        .bind(customer.salary)
        .bind(&customer.address)
        .bind(&customer.city)
        .bind(&customer.province)
        .bind(&customer.postal_code)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                StoreError::DuplicateCustomer {
                    customer_id: customer.id.clone(),
                }
            } else {
                StoreError::Storage(e)
            }
        })?;
        Ok(())
    }

    #[instrument(skip(self, customer), fields(customer_id = %customer.id), err)]
    pub async fn update(&self, customer: &Customer) -> StoreResult<bool> {
        let result = sqlx::query(
            "UPDATE customers SET title = ?1, name = ?2, date_of_birth = ?3, salary = ?4, \
             address = ?5, city = ?6, province = ?7, postal_code = ?8 WHERE customer_id = ?9",
        )
        .bind(&customer.title)
        .bind(&customer.name)
        .bind(customer.date_of_birth)
        .bind(customer.salary)
        .bind(&customer.address)
        .bind(&customer.city)
        .bind(&customer.province)
        .bind(&customer.postal_code)
        .bind(customer.id.as_str())
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self), fields(customer_id = %customer_id), err)]
    pub async fn delete(&self, customer_id: &CustomerId) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM customers WHERE customer_id = ?1")
            .bind(customer_id.as_str())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn find(&self, customer_id: &CustomerId) -> StoreResult<Option<Customer>> {
        let row = sqlx::query(
            "SELECT customer_id, title, name, date_of_birth, salary, address, city, province, postal_code \
             FROM customers WHERE customer_id = ?1",
        )
        .bind(customer_id.as_str())
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(customer_from_row(&row)?)),
            None => Ok(None),
        }
    }

    pub async fn list(&self) -> StoreResult<Vec<Customer>> {
        let rows = sqlx::query(
            "SELECT customer_id, title, name, date_of_birth, salary, address, city, province, postal_code \
             FROM customers ORDER BY customer_id",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut customers = Vec::with_capacity(rows.len());
        for row in rows {
            customers.push(customer_from_row(&row)?);
        }
        Ok(customers)
    }
}

fn customer_from_row(row: &sqlx::sqlite::SqliteRow) -> StoreResult<Customer> {
    let customer = Customer::new(
        CustomerId::new(row.try_get::<String, _>("customer_id")?)?,
        row.try_get::<String, _>("title")?,
        row.try_get::<String, _>("name")?,
        row.try_get::<NaiveDate, _>("date_of_birth")?,
        row.try_get("salary")?,
        row.try_get::<String, _>("address")?,
        row.try_get::<String, _>("city")?,
        row.try_get::<String, _>("province")?,
        row.try_get::<String, _>("postal_code")?,
    )?;
    Ok(customer)
}
