//! The stock ledger: authoritative on-hand quantity per item.
//!
//! Every function takes the transactional connection so reservations and
//! releases compose into the transaction manager's unit of work. Nothing
//! here reads stock and then writes it back: [`reserve`] is one conditional
//! UPDATE evaluated under SQLite's write lock, so two callers contending
//! for the last unit cannot both succeed.

use sqlx::{Row, SqliteConnection};
use tracing::instrument;

use orderdesk_core::ItemCode;

use crate::error::{StoreError, StoreResult};

/// Conditionally decrement stock for `item_code` by `quantity`.
///
/// Succeeds only when the current on-hand quantity is at least `quantity`;
/// otherwise the item is untouched and the caller gets
/// [`StoreError::InsufficientStock`] (or [`StoreError::ItemNotFound`] for
/// an unknown code).
#[instrument(skip(conn), fields(item_code = %item_code, quantity), err)]
pub async fn reserve(
    conn: &mut SqliteConnection,
    item_code: &ItemCode,
    quantity: i64,
) -> StoreResult<()> {
    let affected = sqlx::query(
        r#"
        UPDATE items
        SET qty_on_hand = qty_on_hand - ?1
        WHERE item_code = ?2 AND qty_on_hand >= ?1
        "#,
    )
    .bind(quantity)
    .bind(item_code.as_str())
    .execute(&mut *conn)
    .await?
    .rows_affected();

    if affected == 1 {
        return Ok(());
    }

    // Zero rows: same transaction, so this read disambiguates cleanly.
    match quantity_row(conn, item_code).await? {
        Some(available) => Err(StoreError::InsufficientStock {
            item_code: item_code.clone(),
            available,
            requested: quantity,
        }),
        None => Err(StoreError::ItemNotFound {
            item_code: item_code.clone(),
        }),
    }
}

/// Unconditionally restore `quantity` units of stock for `item_code`.
#[instrument(skip(conn), fields(item_code = %item_code, quantity), err)]
pub async fn release(
    conn: &mut SqliteConnection,
    item_code: &ItemCode,
    quantity: i64,
) -> StoreResult<()> {
    let affected = sqlx::query(
        r#"
        UPDATE items
        SET qty_on_hand = qty_on_hand + ?1
        WHERE item_code = ?2
        "#,
    )
    .bind(quantity)
    .bind(item_code.as_str())
    .execute(&mut *conn)
    .await?
    .rows_affected();

    if affected == 0 {
        return Err(StoreError::ItemNotFound {
            item_code: item_code.clone(),
        });
    }
    Ok(())
}

/// Read the current on-hand quantity for `item_code`.
pub async fn current_quantity(
    conn: &mut SqliteConnection,
    item_code: &ItemCode,
) -> StoreResult<i64> {
    quantity_row(conn, item_code)
        .await?
        .ok_or_else(|| StoreError::ItemNotFound {
            item_code: item_code.clone(),
        })
}

async fn quantity_row(
    conn: &mut SqliteConnection,
    item_code: &ItemCode,
) -> StoreResult<Option<i64>> {
    let row = sqlx::query("SELECT qty_on_hand FROM items WHERE item_code = ?1")
        .bind(item_code.as_str())
        .fetch_optional(&mut *conn)
        .await?;

    match row {
        Some(row) => Ok(Some(row.try_get("qty_on_hand")?)),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    fn code(s: &str) -> ItemCode {
        ItemCode::new(s).unwrap()
    }

    async fn seed(conn: &mut SqliteConnection, item_code: &str, qty: i64) {
        sqlx::query(
            "INSERT INTO items (item_code, description, pack_size, unit_price, qty_on_hand) \
             VALUES (?1, 'Test item', '1 unit', 10.0, ?2)",
        )
        .bind(item_code)
        .bind(qty)
        .execute(conn)
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn reserve_takes_exactly_the_available_stock() {
        let pool = db::connect_memory().await.unwrap();
        let mut conn = pool.acquire().await.unwrap();
        seed(&mut conn, "P001", 5).await;

        reserve(&mut conn, &code("P001"), 5).await.unwrap();
        assert_eq!(current_quantity(&mut conn, &code("P001")).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn reserve_beyond_stock_fails_and_leaves_stock_unchanged() {
        let pool = db::connect_memory().await.unwrap();
        let mut conn = pool.acquire().await.unwrap();
        seed(&mut conn, "P001", 2).await;

        let err = reserve(&mut conn, &code("P001"), 3).await.unwrap_err();
        match err {
            StoreError::InsufficientStock {
                available,
                requested,
                ..
            } => {
                assert_eq!(available, 2);
                assert_eq!(requested, 3);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(current_quantity(&mut conn, &code("P001")).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn reserve_and_release_report_unknown_items() {
        let pool = db::connect_memory().await.unwrap();
        let mut conn = pool.acquire().await.unwrap();

        assert!(matches!(
            reserve(&mut conn, &code("P404"), 1).await,
            Err(StoreError::ItemNotFound { .. })
        ));
        assert!(matches!(
            release(&mut conn, &code("P404"), 1).await,
            Err(StoreError::ItemNotFound { .. })
        ));
        assert!(matches!(
            current_quantity(&mut conn, &code("P404")).await,
            Err(StoreError::ItemNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn release_restores_stock() {
        let pool = db::connect_memory().await.unwrap();
        let mut conn = pool.acquire().await.unwrap();
        seed(&mut conn, "P001", 1).await;

        release(&mut conn, &code("P001"), 4).await.unwrap();
        assert_eq!(current_quantity(&mut conn, &code("P001")).await.unwrap(), 5);
    }
}
