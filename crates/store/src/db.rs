//! Connection pool construction and schema setup.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};

use crate::error::{StoreError, StoreResult};

/// Environment variable holding the database URL for [`connect_default`].
pub const DB_ENV_VAR: &str = "ORDERDESK_DB";

/// Idempotent schema; applied on every connect.
///
/// No foreign keys between orders, order lines, and items: cross-entity
/// consistency is carried entirely by the transaction manager's unit of
/// work, matching the referential shape the data model describes.
const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS items (
        item_code   TEXT PRIMARY KEY,
        description TEXT NOT NULL,
        pack_size   TEXT NOT NULL,
        unit_price  REAL NOT NULL CHECK (unit_price >= 0),
        qty_on_hand INTEGER NOT NULL CHECK (qty_on_hand >= 0)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS customers (
        customer_id   TEXT PRIMARY KEY,
        title         TEXT NOT NULL,
        name          TEXT NOT NULL,
        date_of_birth TEXT NOT NULL,
        salary        REAL NOT NULL CHECK (salary >= 0),
        address       TEXT NOT NULL,
        city          TEXT NOT NULL,
        province      TEXT NOT NULL,
        postal_code   TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS orders (
        order_id    TEXT PRIMARY KEY,
        order_date  TEXT NOT NULL,
        customer_id TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS order_lines (
        order_id     TEXT NOT NULL,
        item_code    TEXT NOT NULL,
        quantity     INTEGER NOT NULL CHECK (quantity > 0),
        discount_pct REAL NOT NULL CHECK (discount_pct >= 0 AND discount_pct <= 100),
        PRIMARY KEY (order_id, item_code)
    )
    "#,
];

/// Connect to the database at `url` and apply the schema.
///
/// WAL journal mode plus a busy timeout make concurrent callers queue on
/// the single SQLite writer instead of failing.
pub async fn connect(url: &str) -> StoreResult<SqlitePool> {
    let options = SqliteConnectOptions::from_str(url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(5));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    apply_schema(&pool).await?;
    Ok(pool)
}

/// Connect to a fresh in-memory database (tests, demos).
///
/// Every `:memory:` connection is a distinct database, so the pool is
/// pinned to exactly one connection that never expires.
pub async fn connect_memory() -> StoreResult<SqlitePool> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?;

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await?;

    apply_schema(&pool).await?;
    Ok(pool)
}

/// Connect using `ORDERDESK_DB`, falling back to a per-user database under
/// the OS app-data directory (`{data_dir}/orderdesk/orderdesk.db`).
pub async fn connect_default() -> StoreResult<SqlitePool> {
    let url = match std::env::var(DB_ENV_VAR) {
        Ok(url) => url,
        Err(_) => {
            let path = default_db_path()?;
            tracing::warn!(
                env = DB_ENV_VAR,
                path = %path.display(),
                "database URL not set; using per-user default"
            );
            format!("sqlite://{}", path.display())
        }
    };
    connect(&url).await
}

async fn apply_schema(pool: &SqlitePool) -> StoreResult<()> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }
    Ok(())
}

/// Resolve `{app_data_dir}/orderdesk/orderdesk.db`, creating the directory.
fn default_db_path() -> StoreResult<PathBuf> {
    let base = dirs::data_dir()
        .or_else(|| {
            dirs::home_dir().map(|mut h| {
                h.push(".local");
                h.push("share");
                h
            })
        })
        .ok_or_else(|| {
            StoreError::Config(
                "failed to resolve OS app data directory - tried data_dir() and home_dir()/.local/share".into(),
            )
        })?;

    let mut dir = base;
    dir.push("orderdesk");
    std::fs::create_dir_all(&dir)
        .map_err(|e| StoreError::Config(format!("failed to create {}: {e}", dir.display())))?;

    dir.push("orderdesk.db");
    Ok(dir)
}
