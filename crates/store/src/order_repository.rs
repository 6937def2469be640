//! Order header and order line rows.
//!
//! Connection-scoped like the stock ledger; the transaction manager decides
//! the unit of work. Reads that feed total computation join the item table
//! for description and unit price, but only quantity, unit price, and
//! discount flow into the math.

use chrono::NaiveDate;
use sqlx::{Row, SqliteConnection};

use orderdesk_core::{CustomerId, ItemCode, OrderId};
use orderdesk_orders::{OrderHeader, OrderLine, PricedLine};

use crate::error::{StoreError, StoreResult, is_unique_violation};

/// Insert one order header row.
pub async fn insert_header(conn: &mut SqliteConnection, header: &OrderHeader) -> StoreResult<()> {
    sqlx::query("INSERT INTO orders (order_id, order_date, customer_id) VALUES (?1, ?2, ?3)")
        .bind(header.id.as_str())
        .bind(header.order_date)
        .bind(header.customer_id.as_str())
        .execute(&mut *conn)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                StoreError::DuplicateOrder {
                    order_id: header.id.clone(),
                }
            } else {
                StoreError::Storage(e)
            }
        })?;
    Ok(())
}

/// Insert one order line row.
pub async fn insert_line(conn: &mut SqliteConnection, line: &OrderLine) -> StoreResult<()> {
    sqlx::query(
        "INSERT INTO order_lines (order_id, item_code, quantity, discount_pct) \
         VALUES (?1, ?2, ?3, ?4)",
    )
    .bind(line.order_id.as_str())
    .bind(line.item_code.as_str())
    .bind(line.quantity)
    .bind(line.discount_pct)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

/// Delete all lines for an order; returns the number of rows removed.
pub async fn delete_lines(conn: &mut SqliteConnection, order_id: &OrderId) -> StoreResult<u64> {
    let result = sqlx::query("DELETE FROM order_lines WHERE order_id = ?1")
        .bind(order_id.as_str())
        .execute(&mut *conn)
        .await?;
    Ok(result.rows_affected())
}

/// Delete the header for an order; returns the number of rows removed.
pub async fn delete_header(conn: &mut SqliteConnection, order_id: &OrderId) -> StoreResult<u64> {
    let result = sqlx::query("DELETE FROM orders WHERE order_id = ?1")
        .bind(order_id.as_str())
        .execute(&mut *conn)
        .await?;
    Ok(result.rows_affected())
}

/// Read an order's lines joined with item description and unit price,
/// ordered by item code.
pub async fn lines_for(
    conn: &mut SqliteConnection,
    order_id: &OrderId,
) -> StoreResult<Vec<PricedLine>> {
    let rows = sqlx::query(
        r#"
        SELECT l.item_code, i.description, l.quantity, i.unit_price, l.discount_pct
        FROM order_lines l
        JOIN items i ON l.item_code = i.item_code
        WHERE l.order_id = ?1
        ORDER BY l.item_code
        "#,
    )
    .bind(order_id.as_str())
    .fetch_all(&mut *conn)
    .await?;

    let mut lines = Vec::with_capacity(rows.len());
    for row in rows {
        lines.push(PricedLine {
            item_code: ItemCode::new(row.try_get::<String, _>("item_code")?)?,
            description: row.try_get("description")?,
            quantity: row.try_get("quantity")?,
            unit_price: row.try_get("unit_price")?,
            discount_pct: row.try_get("discount_pct")?,
        });
    }
    Ok(lines)
}

/// Lean read of `(item code, quantity)` pairs for an order, used when
/// releasing stock on delete.
pub async fn line_quantities(
    conn: &mut SqliteConnection,
    order_id: &OrderId,
) -> StoreResult<Vec<(ItemCode, i64)>> {
    let rows = sqlx::query("SELECT item_code, quantity FROM order_lines WHERE order_id = ?1")
        .bind(order_id.as_str())
        .fetch_all(&mut *conn)
        .await?;

    let mut quantities = Vec::with_capacity(rows.len());
    for row in rows {
        quantities.push((
            ItemCode::new(row.try_get::<String, _>("item_code")?)?,
            row.try_get("quantity")?,
        ));
    }
    Ok(quantities)
}

/// Read the stored quantity for one `(order id, item code)` line.
pub async fn line_quantity(
    conn: &mut SqliteConnection,
    order_id: &OrderId,
    item_code: &ItemCode,
) -> StoreResult<Option<i64>> {
    let row = sqlx::query(
        "SELECT quantity FROM order_lines WHERE order_id = ?1 AND item_code = ?2",
    )
    .bind(order_id.as_str())
    .bind(item_code.as_str())
    .fetch_optional(&mut *conn)
    .await?;

    match row {
        Some(row) => Ok(Some(row.try_get("quantity")?)),
        None => Ok(None),
    }
}

/// Update one line's stored quantity; returns rows affected. Stock
/// coupling lives in the transaction manager, never here.
pub async fn update_line_quantity(
    conn: &mut SqliteConnection,
    order_id: &OrderId,
    item_code: &ItemCode,
    quantity: i64,
) -> StoreResult<u64> {
    let result = sqlx::query(
        "UPDATE order_lines SET quantity = ?1 WHERE order_id = ?2 AND item_code = ?3",
    )
    .bind(quantity)
    .bind(order_id.as_str())
    .bind(item_code.as_str())
    .execute(&mut *conn)
    .await?;
    Ok(result.rows_affected())
}

/// Update one line's discount; returns rows affected. No stock coupling.
pub async fn update_line_discount(
    conn: &mut SqliteConnection,
    order_id: &OrderId,
    item_code: &ItemCode,
    discount_pct: f64,
) -> StoreResult<u64> {
    let result = sqlx::query(
        "UPDATE order_lines SET discount_pct = ?1 WHERE order_id = ?2 AND item_code = ?3",
    )
    .bind(discount_pct)
    .bind(order_id.as_str())
    .bind(item_code.as_str())
    .execute(&mut *conn)
    .await?;
    Ok(result.rows_affected())
}

/// Highest existing order id.
///
/// Ordering is length-first so `D1000` ranks above `D999`; plain
/// lexicographic order would stall the sequence at the width boundary.
pub async fn last_order_id(conn: &mut SqliteConnection) -> StoreResult<Option<OrderId>> {
    let row = sqlx::query(
        "SELECT order_id FROM orders ORDER BY length(order_id) DESC, order_id DESC LIMIT 1",
    )
    .fetch_optional(&mut *conn)
    .await?;

    match row {
        Some(row) => Ok(Some(OrderId::new(row.try_get::<String, _>("order_id")?)?)),
        None => Ok(None),
    }
}

/// All order headers, newest order date first.
pub async fn list_orders(conn: &mut SqliteConnection) -> StoreResult<Vec<OrderHeader>> {
    let rows = sqlx::query(
        "SELECT order_id, order_date, customer_id FROM orders ORDER BY order_date DESC, order_id",
    )
    .fetch_all(&mut *conn)
    .await?;

    let mut orders = Vec::with_capacity(rows.len());
    for row in rows {
        orders.push(header_from_row(&row)?);
    }
    Ok(orders)
}

/// One order header by id.
pub async fn find_order(
    conn: &mut SqliteConnection,
    order_id: &OrderId,
) -> StoreResult<Option<OrderHeader>> {
    let row = sqlx::query("SELECT order_id, order_date, customer_id FROM orders WHERE order_id = ?1")
        .bind(order_id.as_str())
        .fetch_optional(&mut *conn)
        .await?;

    match row {
        Some(row) => Ok(Some(header_from_row(&row)?)),
        None => Ok(None),
    }
}

fn header_from_row(row: &sqlx::sqlite::SqliteRow) -> StoreResult<OrderHeader> {
    Ok(OrderHeader {
        id: OrderId::new(row.try_get::<String, _>("order_id")?)?,
        order_date: row.try_get::<NaiveDate, _>("order_date")?,
        customer_id: CustomerId::new(row.try_get::<String, _>("customer_id")?)?,
    })
}
