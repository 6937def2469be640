//! Place and inspect an order end to end against an in-memory database.
//!
//! Run with `cargo run -p orderdesk-store --example quickstart`.

use anyhow::Result;
use chrono::NaiveDate;

use orderdesk_core::{CustomerId, ItemCode};
use orderdesk_customers::Customer;
use orderdesk_inventory::Item;
use orderdesk_orders::{DraftLine, OrderDraft, OrderHeader};
use orderdesk_store::{CustomerDirectory, ItemCatalog, OrderTransactionManager, db};

#[tokio::main]
async fn main() -> Result<()> {
    orderdesk_observability::init();

    let pool = db::connect_memory().await?;

    let catalog = ItemCatalog::new(pool.clone());
    catalog
        .save(&Item::new(
            ItemCode::new("P001")?,
            "Rice",
            "5kg bag",
            1_200.0,
            40,
        )?)
        .await?;
    catalog
        .save(&Item::new(
            ItemCode::new("P002")?,
            "Red lentils",
            "1kg pack",
            380.0,
            60,
        )?)
        .await?;

    let directory = CustomerDirectory::new(pool.clone());
    directory
        .save(&Customer::new(
            CustomerId::new("C001")?,
            "Ms",
            "Amara Perera",
            "1991-07-14".parse::<NaiveDate>()?,
            52_000.0,
            "12 Lake Rd",
            "Colombo",
            "Western",
            "00300",
        )?)
        .await?;

    let manager = OrderTransactionManager::new(pool.clone());

    let order_id = manager.next_order_id().await?;
    let header = OrderHeader {
        id: order_id.clone(),
        order_date: "2026-08-30".parse::<NaiveDate>()?,
        customer_id: CustomerId::new("C001")?,
    };
    let draft = OrderDraft::new(
        header,
        vec![
            DraftLine::new(ItemCode::new("P001")?, 2, 10.0)?,
            DraftLine::new(ItemCode::new("P002")?, 5, 0.0)?,
        ],
    )?;

    manager.place_order(&draft).await?;

    for line in manager.lines_for(&order_id).await? {
        tracing::info!(
            item = %line.item_code,
            description = line.description,
            quantity = line.quantity,
            line_total = line.line_total(),
            "order line"
        );
    }
    tracing::info!(
        %order_id,
        total = manager.order_total(&order_id).await?,
        "order placed"
    );

    Ok(())
}
