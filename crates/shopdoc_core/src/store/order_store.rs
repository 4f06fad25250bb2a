//! SQLite-backed order store.
//!
//! Orders span two tables: the `orders` header row carries the lock token
//! and `order_items` carries the product links. The guarded header update
//! and the item replacement share one `IMMEDIATE` transaction, so they are
//! accepted or rejected together.

use super::sqlite::{
    bool_to_int, ensure_connection_ready, new_document_id, parse_flag, parse_product_row,
    parse_version, version_to_db, with_read_tx, with_write_tx,
};
use super::{DocumentFilter, DocumentFlag, DocumentStore, PageRequest, StoreError, StoreResult};
use crate::model::order::{Order, OrderItem};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};

const ORDER_SELECT_SQL: &str = "SELECT id, version, removed, customer_id FROM orders";

const ORDER_ITEMS_SQL: &str = "SELECT
    oi.quantity AS quantity,
    p.id AS id,
    p.version AS version,
    p.removed AS removed,
    p.brand AS brand,
    p.name AS name,
    p.description AS description,
    p.price AS price
FROM order_items oi
JOIN products p ON p.id = oi.product_id
WHERE oi.order_id = ?1
ORDER BY oi.position ASC;";

/// Order store over the `orders` and `order_items` tables.
pub struct SqliteOrderStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteOrderStore<'conn> {
    /// Creates store from migrated connection.
    pub fn try_new(conn: &'conn Connection) -> StoreResult<Self> {
        ensure_connection_ready(
            conn,
            "orders",
            &["seq", "id", "version", "removed", "customer_id"],
        )?;
        ensure_connection_ready(
            conn,
            "order_items",
            &["order_id", "position", "quantity", "product_id"],
        )?;
        Ok(Self { conn })
    }
}

impl DocumentStore<Order> for SqliteOrderStore<'_> {
    fn get(&self, id: &str) -> StoreResult<Option<Order>> {
        with_read_tx(self.conn, |tx| load_order(tx, id))
    }

    fn insert(&self, doc: &Order) -> StoreResult<Order> {
        let id = doc.id.clone().unwrap_or_else(new_document_id);
        with_write_tx(self.conn, |tx| {
            tx.execute(
                "INSERT INTO orders (id, version, removed, customer_id) VALUES (?1, 0, 0, ?2);",
                params![id, doc.customer_id.as_str()],
            )?;
            write_items(tx, &id, &doc.items)?;

            load_order(tx, &id)?.ok_or_else(|| {
                StoreError::InvalidData(format!("order `{id}` vanished inside its insert"))
            })
        })
    }

    fn conditional_update(&self, doc: &Order) -> StoreResult<Option<Order>> {
        let id = doc.id.as_deref().ok_or(StoreError::MissingKey("id"))?;
        let version = doc.version.ok_or(StoreError::MissingKey("version"))?;
        let Some(version) = version_to_db(version) else {
            return Ok(None);
        };

        with_write_tx(self.conn, |tx| {
            let changed = tx.execute(
                "UPDATE orders
                 SET
                    customer_id = ?1,
                    version = version + 1
                 WHERE id = ?2 AND version = ?3;",
                params![doc.customer_id.as_str(), id, version],
            )?;
            if changed == 0 {
                return Ok(None);
            }

            tx.execute("DELETE FROM order_items WHERE order_id = ?1;", [id])?;
            write_items(tx, id, &doc.items)?;

            let stored = load_order(tx, id)?.ok_or_else(|| {
                StoreError::InvalidData(format!("order `{id}` vanished inside its update"))
            })?;
            Ok(Some(stored))
        })
    }

    fn find_page(&self, filter: &DocumentFilter, page: &PageRequest) -> StoreResult<Vec<Order>> {
        let mut sql = format!("{ORDER_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(removed) = filter.removed {
            sql.push_str(" AND removed = ?");
            bind_values.push(Value::Integer(bool_to_int(removed)));
        }

        sql.push_str(" ORDER BY seq ASC LIMIT ? OFFSET ?");
        bind_values.push(Value::Integer(page.page_size()));
        bind_values.push(Value::Integer(page.offset()));

        with_read_tx(self.conn, |tx| {
            let mut orders = Vec::new();
            {
                let mut stmt = tx.prepare(&sql)?;
                let mut rows = stmt.query(params_from_iter(bind_values))?;
                while let Some(row) = rows.next()? {
                    orders.push(parse_order_header(row)?);
                }
            }

            for order in &mut orders {
                if let Some(id) = order.id.as_deref() {
                    order.items = load_items(tx, id)?;
                }
            }

            Ok(orders)
        })
    }

    fn patch_flag(&self, id: &str, flag: DocumentFlag, value: bool) -> StoreResult<bool> {
        with_write_tx(self.conn, |tx| {
            let changed = tx.execute(
                &format!("UPDATE orders SET {} = ?1 WHERE id = ?2;", flag.column()),
                params![bool_to_int(value), id],
            )?;
            Ok(changed > 0)
        })
    }

    fn delete(&self, id: &str) -> StoreResult<()> {
        with_write_tx(self.conn, |tx| {
            tx.execute("DELETE FROM order_items WHERE order_id = ?1;", [id])?;
            tx.execute("DELETE FROM orders WHERE id = ?1;", [id])?;
            Ok(())
        })
    }
}

fn load_order(conn: &Connection, id: &str) -> StoreResult<Option<Order>> {
    let Some(mut order) = load_order_header(conn, id)? else {
        return Ok(None);
    };
    order.items = load_items(conn, id)?;
    Ok(Some(order))
}

fn load_order_header(conn: &Connection, id: &str) -> StoreResult<Option<Order>> {
    let mut stmt = conn.prepare(&format!("{ORDER_SELECT_SQL} WHERE id = ?1;"))?;
    let mut rows = stmt.query([id])?;
    if let Some(row) = rows.next()? {
        return Ok(Some(parse_order_header(row)?));
    }

    Ok(None)
}

fn load_items(conn: &Connection, order_id: &str) -> StoreResult<Vec<OrderItem>> {
    let mut stmt = conn.prepare(ORDER_ITEMS_SQL)?;
    let mut rows = stmt.query([order_id])?;
    let mut items = Vec::new();
    while let Some(row) = rows.next()? {
        let quantity: i64 = row.get("quantity")?;
        let quantity = u32::try_from(quantity).map_err(|_| {
            StoreError::InvalidData(format!(
                "invalid quantity `{quantity}` in order_items.quantity"
            ))
        })?;
        items.push(OrderItem {
            quantity,
            product: parse_product_row(row)?,
        });
    }
    Ok(items)
}

fn write_items(conn: &Connection, order_id: &str, items: &[OrderItem]) -> StoreResult<()> {
    let mut insert = conn.prepare(
        "INSERT INTO order_items (order_id, position, quantity, product_id)
         VALUES (?1, ?2, ?3, ?4);",
    )?;

    for (position, item) in items.iter().enumerate() {
        let product_id = item
            .product_id()
            .ok_or(StoreError::MissingKey("items.product.id"))?;
        if !product_exists(conn, product_id)? {
            return Err(StoreError::UnresolvedReference(product_id.to_string()));
        }

        let position = i64::try_from(position)
            .map_err(|_| StoreError::InvalidData(format!("item position {position} overflows")))?;
        insert.execute(params![
            order_id,
            position,
            i64::from(item.quantity),
            product_id
        ])?;
    }

    Ok(())
}

fn product_exists(conn: &Connection, product_id: &str) -> StoreResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM products WHERE id = ?1);",
        [product_id],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn parse_order_header(row: &Row<'_>) -> StoreResult<Order> {
    Ok(Order {
        id: Some(row.get("id")?),
        version: Some(parse_version(row, "orders")?),
        removed: parse_flag(row, "removed", "orders")?,
        customer_id: row.get("customer_id")?,
        items: Vec::new(),
    })
}
