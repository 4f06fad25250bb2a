//! SQLite helpers shared by the document store implementations.

use super::{StoreError, StoreResult};
use crate::db::migrations::latest_version;
use crate::model::entity::EntityId;
use crate::model::product::Product;
use rusqlite::{Connection, Row, Transaction, TransactionBehavior};
use rust_decimal::Decimal;
use std::str::FromStr;
use uuid::Uuid;

/// Product columns in the order `parse_product_row` expects by name.
pub(crate) const PRODUCT_COLUMNS: &str = "id, version, removed, brand, name, description, price";

/// Generates a fresh opaque document id.
pub(crate) fn new_document_id() -> EntityId {
    Uuid::new_v4().to_string()
}

pub(crate) fn parse_product_row(row: &Row<'_>) -> StoreResult<Product> {
    let price_text: String = row.get("price")?;
    let price = Decimal::from_str(&price_text).map_err(|_| {
        StoreError::InvalidData(format!("invalid price `{price_text}` in products.price"))
    })?;

    Ok(Product {
        id: Some(row.get("id")?),
        version: Some(parse_version(row, "products")?),
        removed: parse_flag(row, "removed", "products")?,
        brand: row.get("brand")?,
        name: row.get("name")?,
        description: row.get("description")?,
        price,
    })
}

pub(crate) fn parse_version(row: &Row<'_>, table: &'static str) -> StoreResult<u64> {
    let raw: i64 = row.get("version")?;
    u64::try_from(raw)
        .map_err(|_| StoreError::InvalidData(format!("negative version `{raw}` in {table}.version")))
}

pub(crate) fn parse_flag(row: &Row<'_>, column: &'static str, table: &'static str) -> StoreResult<bool> {
    match row.get::<_, i64>(column)? {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(StoreError::InvalidData(format!(
            "invalid flag value `{other}` in {table}.{column}"
        ))),
    }
}

/// Converts a caller version into the SQLite integer domain.
///
/// A version beyond `i64::MAX` can never be stored, so it can never match.
pub(crate) fn version_to_db(version: u64) -> Option<i64> {
    i64::try_from(version).ok()
}

pub(crate) fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}

/// Runs `write` inside a `BEGIN IMMEDIATE` transaction.
///
/// Taking the write lock up front lets the busy timeout serialize competing
/// writers; an autocommit write that upgrades from a read lock can instead
/// fail with `SQLITE_BUSY` without waiting.
pub(crate) fn with_write_tx<T>(
    conn: &Connection,
    write: impl FnOnce(&Transaction<'_>) -> StoreResult<T>,
) -> StoreResult<T> {
    let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate)?;
    let value = write(&tx)?;
    tx.commit()?;
    Ok(value)
}

/// Runs `read` inside a deferred transaction so multi-statement reads
/// observe a single committed state.
pub(crate) fn with_read_tx<T>(
    conn: &Connection,
    read: impl FnOnce(&Transaction<'_>) -> StoreResult<T>,
) -> StoreResult<T> {
    let tx = Transaction::new_unchecked(conn, TransactionBehavior::Deferred)?;
    let value = read(&tx)?;
    tx.commit()?;
    Ok(value)
}

/// Checks that `conn` is migrated and `table` has every `columns` entry.
pub(crate) fn ensure_connection_ready(
    conn: &Connection,
    table: &'static str,
    columns: &[&'static str],
) -> StoreResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(StoreError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    if !table_exists(conn, table)? {
        return Err(StoreError::MissingRequiredTable(table));
    }

    for &column in columns {
        if !table_has_column(conn, table, column)? {
            return Err(StoreError::MissingRequiredColumn { table, column });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> StoreResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> StoreResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
