//! Waste Entry model
//!
//! Represents food thrown away, valued at the time it was logged.

use rusqlite::{params, Connection, Row, ToSql};
use serde::{Deserialize, Serialize};

use super::base_unit_from_row;
use crate::conversion::ConvertedQuantity;
use crate::db::DbResult;
use crate::impact::{ImpactTotals, ItemImpact};

/// Why the food was wasted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum WasteReason {
    Spoiled,
    Leftover,
    Expired,
    Overcooked,
    #[default]
    Other,
}

impl WasteReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            WasteReason::Spoiled => "spoiled",
            WasteReason::Leftover => "leftover",
            WasteReason::Expired => "expired",
            WasteReason::Overcooked => "overcooked",
            WasteReason::Other => "other",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "spoiled" | "spoilt" | "rotten" | "moldy" => WasteReason::Spoiled,
            "leftover" | "leftovers" | "uneaten" => WasteReason::Leftover,
            "expired" => WasteReason::Expired,
            "overcooked" | "burnt" | "burned" => WasteReason::Overcooked,
            _ => WasteReason::Other,
        }
    }
}

/// A logged waste entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WasteEntry {
    pub id: i64,
    pub item_name: String,
    pub quantity: f64,
    pub unit: String,
    pub base_quantity: ConvertedQuantity,
    pub reason: WasteReason,
    pub totals: ImpactTotals,
    pub wasted_on: String, // ISO date: "2026-01-09"
    pub notes: Option<String>,
    pub created_at: String,
}

/// Data for logging a waste entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WasteEntryCreate {
    pub item_name: String,
    pub quantity: f64,
    pub unit: String,
    #[serde(default)]
    pub reason: WasteReason,
    pub wasted_on: String,
    pub notes: Option<String>,
}

/// Waste totals for one item name
#[derive(Debug, Clone, Serialize)]
pub struct WasteItemTotal {
    pub item_name: String,
    pub entry_count: i64,
    pub totals: ImpactTotals,
}

/// Waste totals for one reason
#[derive(Debug, Clone, Serialize)]
pub struct WasteReasonTotal {
    pub reason: WasteReason,
    pub entry_count: i64,
    pub totals: ImpactTotals,
}

/// Build the `wasted_on` range filter shared by list and aggregate queries
fn date_range_filter(
    start_date: Option<&str>,
    end_date: Option<&str>,
) -> (String, Vec<Box<dyn ToSql>>) {
    let mut sql = String::from(" WHERE 1=1");
    let mut params_vec: Vec<Box<dyn ToSql>> = Vec::new();

    if let Some(start) = start_date {
        params_vec.push(Box::new(start.to_string()));
        sql.push_str(&format!(" AND wasted_on >= ?{}", params_vec.len()));
    }

    if let Some(end) = end_date {
        params_vec.push(Box::new(end.to_string()));
        sql.push_str(&format!(" AND wasted_on <= ?{}", params_vec.len()));
    }

    (sql, params_vec)
}

impl WasteEntry {
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
            reason: WasteReason::from_str(row.get::<_, String>("reason")?.as_str()),
            totals: ImpactTotals {
                value: row.get("estimated_value")?,
                carbon_kg: row.get("estimated_carbon_kg")?,
            },
            wasted_on: row.get("wasted_on")?,
            notes: row.get("notes")?,
            created_at: row.get("created_at")?,
        })
    }

    /// Insert a new waste entry with its precomputed impact
    pub fn create(conn: &Connection, data: &WasteEntryCreate, impact: &ItemImpact) -> DbResult<Self> {
        conn.execute(
            r#"
            INSERT INTO waste_entries (
                item_name, quantity, unit, base_quantity, base_unit, reason,
                estimated_value, estimated_carbon_kg, wasted_on, notes
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
            params![
                data.item_name,
                data.quantity,
                data.unit,
                impact.base_quantity.quantity,
                impact.base_quantity.unit.as_str(),
                data.reason.as_str(),
                impact.totals.value,
                impact.totals.carbon_kg,
                data.wasted_on,
                data.notes,
            ],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?.ok_or_else(|| {
            crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows)
        })
    }

    /// Get a waste entry by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM waste_entries WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(entry) => Ok(Some(entry)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// List waste entries, newest first, with optional date range
    pub fn list(
        conn: &Connection,
        start_date: Option<&str>,
        end_date: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> DbResult<Vec<Self>> {
        let (filter, mut params_vec) = date_range_filter(start_date, end_date);
        let mut sql = format!("SELECT * FROM waste_entries{}", filter);

        sql.push_str(" ORDER BY wasted_on DESC, id DESC");

        params_vec.push(Box::new(limit));
        sql.push_str(&format!(" LIMIT ?{}", params_vec.len()));

        params_vec.push(Box::new(offset));
        sql.push_str(&format!(" OFFSET ?{}", params_vec.len()));

        let mut stmt = conn.prepare(&sql)?;
        let params_refs: Vec<&dyn ToSql> = params_vec.iter().map(|p| p.as_ref()).collect();

        let entries = stmt
            .query_map(params_refs.as_slice(), Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(entries)
    }

    /// Count waste entries with optional date range
    pub fn count(conn: &Connection, start_date: Option<&str>, end_date: Option<&str>) -> DbResult<i64> {
        let (filter, params_vec) = date_range_filter(start_date, end_date);
        let sql = format!("SELECT COUNT(*) FROM waste_entries{}", filter);

        let params_refs: Vec<&dyn ToSql> = params_vec.iter().map(|p| p.as_ref()).collect();
        let count: i64 = conn.query_row(&sql, params_refs.as_slice(), |row| row.get(0))?;
        Ok(count)
    }

    /// Sum value and carbon over a date range
    pub fn totals(conn: &Connection, start_date: Option<&str>, end_date: Option<&str>) -> DbResult<ImpactTotals> {
        let (filter, params_vec) = date_range_filter(start_date, end_date);
        let sql = format!(
            "SELECT COALESCE(SUM(estimated_value), 0), COALESCE(SUM(estimated_carbon_kg), 0) FROM waste_entries{}",
            filter
        );

        let params_refs: Vec<&dyn ToSql> = params_vec.iter().map(|p| p.as_ref()).collect();
        let totals = conn.query_row(&sql, params_refs.as_slice(), |row| {
            Ok(ImpactTotals {
                value: row.get(0)?,
                carbon_kg: row.get(1)?,
            })
        })?;
        Ok(totals)
    }

    /// Items with the highest wasted value over a date range
    pub fn top_items(
        conn: &Connection,
        start_date: Option<&str>,
        end_date: Option<&str>,
        limit: i64,
    ) -> DbResult<Vec<WasteItemTotal>> {
        let (filter, mut params_vec) = date_range_filter(start_date, end_date);
        let mut sql = format!(
            r#"
            SELECT MIN(item_name) AS item_name, COUNT(*) AS entry_count,
                   SUM(estimated_value) AS total_value, SUM(estimated_carbon_kg) AS total_carbon
            FROM waste_entries{}
            GROUP BY lower(item_name)
            ORDER BY total_value DESC, item_name ASC
            "#,
            filter
        );

        params_vec.push(Box::new(limit));
        sql.push_str(&format!(" LIMIT ?{}", params_vec.len()));

        let mut stmt = conn.prepare(&sql)?;
        let params_refs: Vec<&dyn ToSql> = params_vec.iter().map(|p| p.as_ref()).collect();

        let items = stmt
            .query_map(params_refs.as_slice(), |row| {
                Ok(WasteItemTotal {
                    item_name: row.get("item_name")?,
                    entry_count: row.get("entry_count")?,
                    totals: ImpactTotals {
                        value: row.get("total_value")?,
                        carbon_kg: row.get("total_carbon")?,
                    },
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(items)
    }

    /// Totals grouped by reason over a date range
    pub fn totals_by_reason(
        conn: &Connection,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> DbResult<Vec<WasteReasonTotal>> {
        let (filter, params_vec) = date_range_filter(start_date, end_date);
        let sql = format!(
            r#"
            SELECT reason, COUNT(*) AS entry_count,
                   SUM(estimated_value) AS total_value, SUM(estimated_carbon_kg) AS total_carbon
            FROM waste_entries{}
            GROUP BY reason
            ORDER BY total_value DESC
            "#,
            filter
        );

        let mut stmt = conn.prepare(&sql)?;
        let params_refs: Vec<&dyn ToSql> = params_vec.iter().map(|p| p.as_ref()).collect();

        let reasons = stmt
            .query_map(params_refs.as_slice(), |row| {
                Ok(WasteReasonTotal {
                    reason: WasteReason::from_str(row.get::<_, String>("reason")?.as_str()),
                    entry_count: row.get("entry_count")?,
                    totals: ImpactTotals {
                        value: row.get("total_value")?,
                        carbon_kg: row.get("total_carbon")?,
                    },
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(reasons)
    }

    /// Delete a waste entry
    /// Returns Ok(true) if deleted, Ok(false) if not found
    pub fn delete(conn: &Connection, id: i64) -> DbResult<bool> {
        let rows = conn.execute("DELETE FROM waste_entries WHERE id = ?1", [id])?;
        Ok(rows > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversion::{BaseUnit, QuantityExpression};
    use crate::db::migrations::run_migrations;
    use crate::impact::estimate_impact;

    const EPS: f64 = 1e-9;

    fn setup() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        conn
    }

    fn log(conn: &Connection, item: &str, quantity: f64, unit: &str, date: &str, reason: WasteReason) -> WasteEntry {
        let data = WasteEntryCreate {
            item_name: item.to_string(),
            quantity,
            unit: unit.to_string(),
            reason,
            wasted_on: date.to_string(),
            notes: None,
        };
        let impact = estimate_impact(&QuantityExpression::new(quantity, unit, item)).unwrap();
        WasteEntry::create(conn, &data, &impact).unwrap()
    }

    #[test]
    fn test_create_and_get() {
        let conn = setup();
        let entry = log(&conn, "Rice", 2.0, "cups", "2026-01-10", WasteReason::Leftover);

        assert_eq!(entry.item_name, "Rice");
        assert_eq!(entry.base_quantity.unit, BaseUnit::Milliliter);
        assert!((entry.base_quantity.quantity - 480.0).abs() < EPS);
        assert_eq!(entry.reason, WasteReason::Leftover);

        let fetched = WasteEntry::get_by_id(&conn, entry.id).unwrap().unwrap();
        assert_eq!(fetched.unit, "cups");
        assert!((fetched.totals.value - entry.totals.value).abs() < EPS);

        assert!(WasteEntry::get_by_id(&conn, 999).unwrap().is_none());
    }

    #[test]
    fn test_list_and_count_by_date_range() {
        let conn = setup();
        log(&conn, "tomato", 1.0, "piece", "2026-01-01", WasteReason::Spoiled);
        log(&conn, "tomato", 2.0, "piece", "2026-01-05", WasteReason::Spoiled);
        log(&conn, "banana", 3.0, "piece", "2026-01-09", WasteReason::Expired);

        let all = WasteEntry::list(&conn, None, None, 50, 0).unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].wasted_on, "2026-01-09");

        let ranged = WasteEntry::list(&conn, Some("2026-01-02"), Some("2026-01-09"), 50, 0).unwrap();
        assert_eq!(ranged.len(), 2);
        assert_eq!(WasteEntry::count(&conn, Some("2026-01-02"), None).unwrap(), 2);

        let paged = WasteEntry::list(&conn, None, None, 1, 1).unwrap();
        assert_eq!(paged.len(), 1);
        assert_eq!(paged[0].wasted_on, "2026-01-05");
    }

    #[test]
    fn test_totals_and_top_items() {
        let conn = setup();
        log(&conn, "tomato", 2.0, "piece", "2026-01-01", WasteReason::Spoiled);
        log(&conn, "Tomato", 1.0, "piece", "2026-01-02", WasteReason::Spoiled);
        log(&conn, "rice", 1.0, "kg", "2026-01-03", WasteReason::Leftover);

        let totals = WasteEntry::totals(&conn, None, None).unwrap();
        // 3 tomatoes at 8 + 10 portions of rice at 6
        assert!((totals.value - 84.0).abs() < EPS);

        let top = WasteEntry::top_items(&conn, None, None, 10).unwrap();
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].item_name, "rice");
        assert_eq!(top[1].entry_count, 2);
        assert!((top[1].totals.value - 24.0).abs() < EPS);

        let reasons = WasteEntry::totals_by_reason(&conn, None, None).unwrap();
        assert_eq!(reasons[0].reason, WasteReason::Leftover);
        assert_eq!(reasons[1].reason, WasteReason::Spoiled);
        assert_eq!(reasons[1].entry_count, 2);
    }

    #[test]
    fn test_totals_empty_range() {
        let conn = setup();
        let totals = WasteEntry::totals(&conn, Some("2030-01-01"), None).unwrap();
        assert_eq!(totals, ImpactTotals::zero());
    }

    #[test]
    fn test_delete() {
        let conn = setup();
        let entry = log(&conn, "bread", 2.0, "piece", "2026-01-01", WasteReason::Other);
        assert!(WasteEntry::delete(&conn, entry.id).unwrap());
        assert!(!WasteEntry::delete(&conn, entry.id).unwrap());
    }

    #[test]
    fn test_reason_from_str() {
        assert_eq!(WasteReason::from_str("Rotten"), WasteReason::Spoiled);
        assert_eq!(WasteReason::from_str("burnt"), WasteReason::Overcooked);
        assert_eq!(WasteReason::from_str("dropped it"), WasteReason::Other);
    }
}
