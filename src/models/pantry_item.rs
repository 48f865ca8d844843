//! Pantry Item model
//!
//! Represents food on hand with a predicted expiration date.

use rusqlite::{params, Connection, Row, ToSql};
use serde::{Deserialize, Serialize};

use super::base_unit_from_row;
use crate::conversion::ConvertedQuantity;
use crate::db::DbResult;

/// A food item currently stored in the pantry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PantryItem {
    pub id: i64,
    pub item_name: String,
    pub quantity: f64,
    pub unit: String,
    pub base_quantity: ConvertedQuantity,
    pub estimated_value: f64,
    pub stored_on: String,  // ISO date
    pub expires_on: String, // ISO date
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Data for adding a pantry item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PantryItemCreate {
    pub item_name: String,
    pub quantity: f64,
    pub unit: String,
    pub base_quantity: ConvertedQuantity,
    pub estimated_value: f64,
    pub stored_on: String,
    pub expires_on: String,
    pub notes: Option<String>,
}

/// Substring filter on item_name; `%`, `_` and `\` in the query match literally
fn name_filter(query: Option<&str>) -> (String, Vec<Box<dyn ToSql>>) {
    match query {
        Some(q) => {
            let escaped = q.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_");
            let pattern: Box<dyn ToSql> = Box::new(format!("%{}%", escaped));
            (" WHERE item_name LIKE ? ESCAPE '\\'".to_string(), vec![pattern])
        }
        None => (String::new(), Vec::new()),
    }
}

impl PantryItem {
    /// Create from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            item_name: row.get("item_name")?,
            quantity: row.get("quantity")?,
            unit: row.get("unit")?,
            base_quantity: ConvertedQuantity {
                quantity: row.get("base_quantity")?,
                unit: base_unit_from_row(row, "base_unit")?,
            },
            estimated_value: row.get("estimated_value")?,
            stored_on: row.get("stored_on")?,
            expires_on: row.get("expires_on")?,
            notes: row.get("notes")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    /// Insert a new pantry item
    pub fn create(conn: &Connection, data: &PantryItemCreate) -> DbResult<Self> {
        conn.execute(
            r#"
            INSERT INTO pantry_items (
                item_name, quantity, unit, base_quantity, base_unit,
                estimated_value, stored_on, expires_on, notes
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
            params![
                data.item_name,
                data.quantity,
                data.unit,
                data.base_quantity.quantity,
                data.base_quantity.unit.as_str(),
                data.estimated_value,
                data.stored_on,
                data.expires_on,
                data.notes,
            ],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?.ok_or_else(|| {
            crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows)
        })
    }

    /// Get a pantry item by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM pantry_items WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(item) => Ok(Some(item)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// List pantry items, soonest expiry first, optionally filtered by name
    pub fn list(conn: &Connection, query: Option<&str>, limit: i64, offset: i64) -> DbResult<Vec<Self>> {
        let (filter, mut params_vec) = name_filter(query);
        let sql = format!(
            "SELECT * FROM pantry_items{} ORDER BY expires_on ASC, id ASC LIMIT ? OFFSET ?",
            filter
        );
        params_vec.push(Box::new(limit));
        params_vec.push(Box::new(offset));

        let params_refs: Vec<&dyn ToSql> = params_vec.iter().map(|p| p.as_ref()).collect();
        let mut stmt = conn.prepare(&sql)?;
        let items = stmt
            .query_map(params_refs.as_slice(), Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(items)
    }

    /// Count pantry items matching the same name filter as `list`
    pub fn count(conn: &Connection, query: Option<&str>) -> DbResult<i64> {
        let (filter, params_vec) = name_filter(query);
        let sql = format!("SELECT COUNT(*) FROM pantry_items{}", filter);

        let params_refs: Vec<&dyn ToSql> = params_vec.iter().map(|p| p.as_ref()).collect();
        let count: i64 = conn.query_row(&sql, params_refs.as_slice(), |row| row.get(0))?;
        Ok(count)
    }

    /// Items expiring on or before the given date (already-expired included)
    pub fn expiring_by(conn: &Connection, date: &str) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM pantry_items WHERE expires_on <= ?1 ORDER BY expires_on ASC, id ASC",
        )?;

        let items = stmt
            .query_map([date], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(items)
    }

    /// Replace the remaining amount after partial use
    pub fn update_quantity(
        conn: &Connection,
        id: i64,
        quantity: f64,
        base_quantity: f64,
        estimated_value: f64,
    ) -> DbResult<Option<Self>> {
        conn.execute(
            r#"
            UPDATE pantry_items
            SET quantity = ?1, base_quantity = ?2, estimated_value = ?3, updated_at = datetime('now')
            WHERE id = ?4
            "#,
            params![quantity, base_quantity, estimated_value, id],
        )?;

        Self::get_by_id(conn, id)
    }

    /// Delete a pantry item
    /// Returns Ok(true) if deleted, Ok(false) if not found
    pub fn delete(conn: &Connection, id: i64) -> DbResult<bool> {
        let rows = conn.execute("DELETE FROM pantry_items WHERE id = ?1", [id])?;
        Ok(rows > 0)
    }
}
