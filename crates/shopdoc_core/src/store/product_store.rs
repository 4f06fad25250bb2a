//! SQLite-backed product store.

use super::sqlite::{
    bool_to_int, ensure_connection_ready, new_document_id, parse_product_row, version_to_db,
    with_write_tx, PRODUCT_COLUMNS,
};
use super::{DocumentFilter, DocumentFlag, DocumentStore, PageRequest, StoreError, StoreResult};
use crate::model::product::Product;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection};

/// Product store over the `products` table.
pub struct SqliteProductStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteProductStore<'conn> {
    /// Creates store from migrated connection.
    pub fn try_new(conn: &'conn Connection) -> StoreResult<Self> {
        ensure_connection_ready(
            conn,
            "products",
            &[
                "seq",
                "id",
                "version",
                "removed",
                "brand",
                "name",
                "description",
                "price",
            ],
        )?;
        Ok(Self { conn })
    }
}

impl DocumentStore<Product> for SqliteProductStore<'_> {
    fn get(&self, id: &str) -> StoreResult<Option<Product>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_product_row(row)?));
        }

        Ok(None)
    }

    fn insert(&self, doc: &Product) -> StoreResult<Product> {
        let id = doc.id.clone().unwrap_or_else(new_document_id);
        with_write_tx(self.conn, |tx| {
            let mut stmt = tx.prepare(&format!(
                "INSERT INTO products (id, version, removed, brand, name, description, price)
                 VALUES (?1, 0, 0, ?2, ?3, ?4, ?5)
                 RETURNING {PRODUCT_COLUMNS};"
            ))?;
            let mut rows = stmt.query(params![
                id,
                doc.brand.as_str(),
                doc.name.as_str(),
                doc.description.as_deref(),
                doc.price.to_string(),
            ])?;
            if let Some(row) = rows.next()? {
                return parse_product_row(row);
            }

            Err(StoreError::InvalidData(format!(
                "insert of product `{id}` returned no row"
            )))
        })
    }

    fn conditional_update(&self, doc: &Product) -> StoreResult<Option<Product>> {
        let id = doc.id.as_deref().ok_or(StoreError::MissingKey("id"))?;
        let version = doc.version.ok_or(StoreError::MissingKey("version"))?;
        let Some(version) = version_to_db(version) else {
            return Ok(None);
        };

        with_write_tx(self.conn, |tx| {
            // Check and increment happen in this one statement.
            let mut stmt = tx.prepare(&format!(
                "UPDATE products
                 SET
                    brand = ?1,
                    name = ?2,
                    description = ?3,
                    price = ?4,
                    version = version + 1
                 WHERE id = ?5 AND version = ?6
                 RETURNING {PRODUCT_COLUMNS};"
            ))?;
            let mut rows = stmt.query(params![
                doc.brand.as_str(),
                doc.name.as_str(),
                doc.description.as_deref(),
                doc.price.to_string(),
                id,
                version,
            ])?;
            if let Some(row) = rows.next()? {
                return Ok(Some(parse_product_row(row)?));
            }

            Ok(None)
        })
    }

    fn find_page(
        &self,
        filter: &DocumentFilter,
        page: &PageRequest,
    ) -> StoreResult<Vec<Product>> {
        let mut sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(removed) = filter.removed {
            sql.push_str(" AND removed = ?");
            bind_values.push(Value::Integer(bool_to_int(removed)));
        }

        sql.push_str(" ORDER BY seq ASC LIMIT ? OFFSET ?");
        bind_values.push(Value::Integer(page.page_size()));
        bind_values.push(Value::Integer(page.offset()));

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut products = Vec::new();
        while let Some(row) = rows.next()? {
            products.push(parse_product_row(row)?);
        }

        Ok(products)
    }

    fn patch_flag(&self, id: &str, flag: DocumentFlag, value: bool) -> StoreResult<bool> {
        with_write_tx(self.conn, |tx| {
            let changed = tx.execute(
                &format!("UPDATE products SET {} = ?1 WHERE id = ?2;", flag.column()),
                params![bool_to_int(value), id],
            )?;
            Ok(changed > 0)
        })
    }

    fn delete(&self, id: &str) -> StoreResult<()> {
        with_write_tx(self.conn, |tx| {
            tx.execute("DELETE FROM products WHERE id = ?1;", [id])?;
            Ok(())
        })
    }
}
