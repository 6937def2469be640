//! The order transaction manager.
//!
//! The only component that writes order headers, order lines, and item
//! stock in the same unit of work. Each operation opens one transaction on
//! the pool it was constructed with, runs the connection-scoped ledger and
//! repository operations inside it, and either commits everything or rolls
//! everything back. A partially placed or partially deleted order is never
//! observable.

use sqlx::{SqliteConnection, SqlitePool};
use tracing::instrument;

use orderdesk_core::{DomainError, ItemCode, OrderId};
use orderdesk_orders::{OrderDraft, OrderHeader, OrderLine, PricedLine, pricing};

use crate::error::{StoreError, StoreResult};
use crate::{order_repository, stock_ledger};

#[derive(Debug, Clone)]
pub struct OrderTransactionManager {
    pool: SqlitePool,
}

impl OrderTransactionManager {
    /// The pool is the unit-of-work factory; there is no process-wide
    /// connection state.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Place an order: reserve stock for every line in the order supplied,
    /// then persist the header and lines, all in one transaction.
    ///
    /// The first line whose reservation fails aborts the whole call; the
    /// error names that item. A header id that already exists surfaces as
    /// [`StoreError::DuplicateOrder`] after the reserved stock has been
    /// rolled back, so the caller can regenerate the id and retry.
    #[instrument(
        skip(self, draft),
        fields(order_id = %draft.header().id, line_count = draft.lines().len()),
        err
    )]
    pub async fn place_order(&self, draft: &OrderDraft) -> StoreResult<()> {
        let mut tx = self.pool.begin().await?;
        match place_order_tx(&mut tx, draft).await {
            Ok(()) => {
                tx.commit().await?;
                Ok(())
            }
            Err(err) => {
                tx.rollback().await?;
                Err(err)
            }
        }
    }

    /// Delete an order, restoring the stock its lines had reserved.
    ///
    /// Returns `false` when no such order exists; nothing is changed and
    /// that is not an error.
    #[instrument(skip(self), fields(order_id = %order_id), err)]
    pub async fn delete_order(&self, order_id: &OrderId) -> StoreResult<bool> {
        let mut tx = self.pool.begin().await?;
        match delete_order_tx(&mut tx, order_id).await {
            Ok(existed) => {
                tx.commit().await?;
                Ok(existed)
            }
            Err(err) => {
                tx.rollback().await?;
                Err(err)
            }
        }
    }

    /// Change a stored line's quantity, adjusting item stock by the signed
    /// delta in the same transaction.
    ///
    /// An increase goes through the conditional reserve, so it fails with
    /// [`StoreError::InsufficientStock`] rather than driving stock
    /// negative, and the failed transaction leaves the stored quantity
    /// untouched. Returns `false` when the line does not exist.
    #[instrument(
        skip(self),
        fields(order_id = %order_id, item_code = %item_code, new_quantity),
        err
    )]
    pub async fn update_line_quantity(
        &self,
        order_id: &OrderId,
        item_code: &ItemCode,
        new_quantity: i64,
    ) -> StoreResult<bool> {
        if new_quantity < 1 {
            return Err(StoreError::Domain(DomainError::validation(
                "order line quantity must be at least 1",
            )));
        }

        let mut tx = self.pool.begin().await?;
        match update_line_quantity_tx(&mut tx, order_id, item_code, new_quantity).await {
            Ok(found) => {
                tx.commit().await?;
                Ok(found)
            }
            Err(err) => {
                tx.rollback().await?;
                Err(err)
            }
        }
    }

    /// Change a stored line's discount. No stock coupling, so this is a
    /// single autocommit statement. Returns `false` for a missing line.
    #[instrument(
        skip(self),
        fields(order_id = %order_id, item_code = %item_code, discount_pct),
        err
    )]
    pub async fn update_line_discount(
        &self,
        order_id: &OrderId,
        item_code: &ItemCode,
        discount_pct: f64,
    ) -> StoreResult<bool> {
        if !(0.0..=100.0).contains(&discount_pct) {
            return Err(StoreError::Domain(DomainError::validation(
                "discount must be between 0 and 100 percent",
            )));
        }

        let mut conn = self.pool.acquire().await?;
        let affected =
            order_repository::update_line_discount(&mut conn, order_id, item_code, discount_pct)
                .await?;
        Ok(affected > 0)
    }

    /// Next order id in the `D`-prefixed sequence, derived from the
    /// highest persisted id.
    pub async fn next_order_id(&self) -> StoreResult<OrderId> {
        let mut conn = self.pool.acquire().await?;
        let last = order_repository::last_order_id(&mut conn).await?;
        Ok(OrderId::next(last.as_ref()))
    }

    pub async fn find_order(&self, order_id: &OrderId) -> StoreResult<Option<OrderHeader>> {
        let mut conn = self.pool.acquire().await?;
        order_repository::find_order(&mut conn, order_id).await
    }

    pub async fn list_orders(&self) -> StoreResult<Vec<OrderHeader>> {
        let mut conn = self.pool.acquire().await?;
        order_repository::list_orders(&mut conn).await
    }

    pub async fn lines_for(&self, order_id: &OrderId) -> StoreResult<Vec<PricedLine>> {
        let mut conn = self.pool.acquire().await?;
        order_repository::lines_for(&mut conn, order_id).await
    }

    /// Monetary total of an order: the sum of its line totals.
    pub async fn order_total(&self, order_id: &OrderId) -> StoreResult<f64> {
        let lines = self.lines_for(order_id).await?;
        Ok(pricing::order_total(&lines))
    }
}

async fn place_order_tx(conn: &mut SqliteConnection, draft: &OrderDraft) -> StoreResult<()> {
    for line in draft.lines() {
        stock_ledger::reserve(conn, line.item_code(), line.quantity()).await?;
    }

    order_repository::insert_header(conn, draft.header()).await?;

    for line in draft.lines() {
        let stored = OrderLine {
            order_id: draft.header().id.clone(),
            item_code: line.item_code().clone(),
            quantity: line.quantity(),
            discount_pct: line.discount_pct(),
        };
        order_repository::insert_line(conn, &stored).await?;
    }

    Ok(())
}

async fn delete_order_tx(conn: &mut SqliteConnection, order_id: &OrderId) -> StoreResult<bool> {
    for (item_code, quantity) in order_repository::line_quantities(conn, order_id).await? {
        stock_ledger::release(conn, &item_code, quantity).await?;
    }

    order_repository::delete_lines(conn, order_id).await?;
    let deleted = order_repository::delete_header(conn, order_id).await?;
    Ok(deleted > 0)
}

async fn update_line_quantity_tx(
    conn: &mut SqliteConnection,
    order_id: &OrderId,
    item_code: &ItemCode,
    new_quantity: i64,
) -> StoreResult<bool> {
    let Some(current) = order_repository::line_quantity(conn, order_id, item_code).await? else {
        return Ok(false);
    };

    order_repository::update_line_quantity(conn, order_id, item_code, new_quantity).await?;

    let delta = new_quantity - current;
    if delta > 0 {
        stock_ledger::reserve(conn, item_code, delta).await?;
    } else if delta < 0 {
        stock_ledger::release(conn, item_code, -delta).await?;
    }

    Ok(true)
}
