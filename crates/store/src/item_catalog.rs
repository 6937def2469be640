//! Item catalog CRUD.
//!
//! Single-row autocommit operations with no cross-entity invariants; stock
//! is only ever decremented through the ledger, but direct catalog edits
//! (including quantity corrections) go through here.

use sqlx::{Row, SqlitePool};
use tracing::instrument;

use orderdesk_core::ItemCode;
use orderdesk_inventory::Item;

use crate::error::{StoreError, StoreResult, is_unique_violation};

#[derive(Debug, Clone)]
pub struct ItemCatalog {
    pool: SqlitePool,
}

impl ItemCatalog {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    #[instrument(skip(self, item), fields(item_code = %item.code), err)]
    pub async fn save(&self, item: &Item) -> StoreResult<()> {
        sqlx::query(
            "INSERT INTO items (item_code, description, pack_size, unit_price, qty_on_hand) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(item.code.as_str())
        .bind(&item.description)
        .bind(&item.pack_size)
        .bind(item.unit_price)
        .bind(item.qty_on_hand)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                StoreError::DuplicateItem {
                    item_code: item.code.clone(),
                }
            } else {
                StoreError::Storage(e)
            }
        })?;
        Ok(())
    }

    /// Overwrite every attribute of an existing item; `false` if the code
    /// is unknown.
    #[instrument(skip(self, item), fields(item_code = %item.code), err)]
    pub async fn update(&self, item: &Item) -> StoreResult<bool> {
        let result = sqlx::query(
            "UPDATE items SET description = ?1, pack_size = ?2, unit_price = ?3, qty_on_hand = ?4 \
             WHERE item_code = ?5",
        )
        .bind(&item.description)
        .bind(&item.pack_size)
        .bind(item.unit_price)
        .bind(item.qty_on_hand)
        .bind(item.code.as_str())
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self), fields(item_code = %item_code), err)]
    pub async fn delete(&self, item_code: &ItemCode) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM items WHERE item_code = ?1")
            .bind(item_code.as_str())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn find(&self, item_code: &ItemCode) -> StoreResult<Option<Item>> {
        let row = sqlx::query(
            "SELECT item_code, description, pack_size, unit_price, qty_on_hand \
             FROM items WHERE item_code = ?1",
        )
        .bind(item_code.as_str())
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(item_from_row(&row)?)),
            None => Ok(None),
        }
    }

    pub async fn list(&self) -> StoreResult<Vec<Item>> {
        let rows = sqlx::query(
            "SELECT item_code, description, pack_size, unit_price, qty_on_hand \
             FROM items ORDER BY item_code",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut items = Vec::with_capacity(rows.len());
        for row in rows {
            items.push(item_from_row(&row)?);
        }
        Ok(items)
    }
}

fn item_from_row(row: &sqlx::sqlite::SqliteRow) -> StoreResult<Item> {
    let item = Item::new(
        ItemCode::new(row.try_get::<String, _>("item_code")?)?,
        row.try_get::<String, _>("description")?,
        row.try_get::<String, _>("pack_size")?,
        row.try_get("unit_price")?,
        row.try_get("qty_on_hand")?,
    )?;
    Ok(item)
}
