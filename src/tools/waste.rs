//! Waste Log MCP Tools
//!
//! Tools for logging wasted food and summarizing its cost.

use chrono::NaiveDate;
use serde::Serialize;

use super::{parse_date_or, validate_date_filter, DeleteResponse, DATE_FORMAT};
use crate::conversion::{parse_quantity_expression, BaseUnit};
use crate::db::Database;
use crate::impact::estimate_impact;
use crate::models::{WasteEntry, WasteEntryCreate, WasteItemTotal, WasteReason, WasteReasonTotal};

/// Response for log_waste
#[derive(Debug, Serialize)]
pub struct LogWasteResponse {
    pub id: i64,
    pub item_name: String,
    pub quantity: f64,
    pub unit: String,
    pub base_quantity: f64,
    pub base_unit: BaseUnit,
    pub reason: WasteReason,
    pub matched_keyword: Option<String>,
    pub estimated_value: f64,
    pub estimated_carbon_kg: f64,
    pub wasted_on: String,
}

/// Response for list_waste_entries
#[derive(Debug, Serialize)]
pub struct ListWasteEntriesResponse {
    pub entries: Vec<WasteEntry>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

/// Response for waste_summary
#[derive(Debug, Serialize)]
pub struct WasteSummaryResponse {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub entry_count: i64,
    pub total_value: f64,
    pub total_carbon_kg: f64,
    pub by_reason: Vec<WasteReasonTotal>,
    pub top_items: Vec<WasteItemTotal>,
}

/// Log wasted food from an amount string such as "1 1/2 cups"
pub fn log_waste(
    db: &Database,
    item_name: &str,
    amount: &str,
    reason: Option<&str>,
    wasted_on: Option<&str>,
    notes: Option<String>,
    today: NaiveDate,
) -> Result<LogWasteResponse, String> {
    let name = item_name.trim();
    if name.is_empty() {
        return Err("item_name cannot be empty".to_string());
    }

    let expr = parse_quantity_expression(amount, name).map_err(|e| e.to_string())?;
    if expr.quantity <= 0.0 {
        return Err("Wasted quantity must be greater than 0".to_string());
    }

    let impact = estimate_impact(&expr).map_err(|e| {
        tracing::warn!("Rejected waste entry for '{}': {}", name, e);
        e.to_string()
    })?;

    let wasted_on = parse_date_or(wasted_on, today)?;
    let data = WasteEntryCreate {
        item_name: expr.item_name,
        quantity: expr.quantity,
        unit: expr.unit,
        reason: reason.map(WasteReason::from_str).unwrap_or_default(),
        wasted_on: wasted_on.format(DATE_FORMAT).to_string(),
        notes,
    };

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let entry = WasteEntry::create(&conn, &data, &impact)
        .map_err(|e| format!("Failed to log waste: {}", e))?;

    tracing::info!(
        "Logged waste #{}: {} {} of {} (PHP {:.2})",
        entry.id,
        entry.quantity,
        entry.unit,
        entry.item_name,
        entry.totals.value
    );

    Ok(LogWasteResponse {
        id: entry.id,
        item_name: entry.item_name,
        quantity: entry.quantity,
        unit: entry.unit,
        base_quantity: entry.base_quantity.quantity,
        base_unit: entry.base_quantity.unit,
        reason: entry.reason,
        matched_keyword: impact.matched_keyword,
        estimated_value: entry.totals.value,
        estimated_carbon_kg: entry.totals.carbon_kg,
        wasted_on: entry.wasted_on,
    })
}

/// Get a waste entry by ID
pub fn get_waste_entry(db: &Database, id: i64) -> Result<Option<WasteEntry>, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    WasteEntry::get_by_id(&conn, id).map_err(|e| format!("Failed to get waste entry: {}", e))
}

/// List waste entries with optional date range and pagination
pub fn list_waste_entries(
    db: &Database,
    start_date: Option<&str>,
    end_date: Option<&str>,
    limit: i64,
    offset: i64,
) -> Result<ListWasteEntriesResponse, String> {
    let limit = limit.clamp(1, 200);
    let offset = offset.max(0);
    let start = validate_date_filter(start_date)?;
    let end = validate_date_filter(end_date)?;

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let entries = WasteEntry::list(&conn, start.as_deref(), end.as_deref(), limit, offset)
        .map_err(|e| format!("Failed to list waste entries: {}", e))?;
    let total = WasteEntry::count(&conn, start.as_deref(), end.as_deref())
        .map_err(|e| format!("Failed to count waste entries: {}", e))?;

    Ok(ListWasteEntriesResponse {
        entries,
        total,
        limit,
        offset,
    })
}

/// Delete a waste entry
pub fn delete_waste_entry(db: &Database, id: i64) -> Result<DeleteResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let deleted = WasteEntry::delete(&conn, id)
        .map_err(|e| format!("Failed to delete waste entry: {}", e))?;
    if !deleted {
        return Err(format!("Waste entry not found with id: {}", id));
    }

    Ok(DeleteResponse {
        success: true,
        deleted_id: id,
    })
}

/// Total value and carbon of waste over a date range
pub fn waste_summary(
    db: &Database,
    start_date: Option<&str>,
    end_date: Option<&str>,
    top_n: i64,
) -> Result<WasteSummaryResponse, String> {
    let top_n = top_n.clamp(1, 50);
    let start = validate_date_filter(start_date)?;
    let end = validate_date_filter(end_date)?;

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let entry_count = WasteEntry::count(&conn, start.as_deref(), end.as_deref())
        .map_err(|e| format!("Failed to count waste entries: {}", e))?;
    let totals = WasteEntry::totals(&conn, start.as_deref(), end.as_deref())
        .map_err(|e| format!("Failed to total waste: {}", e))?;
    let by_reason = WasteEntry::totals_by_reason(&conn, start.as_deref(), end.as_deref())
        .map_err(|e| format!("Failed to group waste by reason: {}", e))?;
    let top_items = WasteEntry::top_items(&conn, start.as_deref(), end.as_deref(), top_n)
        .map_err(|e| format!("Failed to rank wasted items: {}", e))?;

    Ok(WasteSummaryResponse {
        start_date: start,
        end_date: end,
        entry_count,
        total_value: totals.value,
        total_carbon_kg: totals.carbon_kg,
        by_reason,
        top_items,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn setup() -> Database {
        Database::in_memory().unwrap()
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 15).unwrap()
    }

    #[test]
    fn test_log_waste() {
        let db = setup();
        let response = log_waste(&db, "Red Tomato", "2 pcs", Some("rotten"), None, None, today()).unwrap();

        assert_eq!(response.base_unit, BaseUnit::Piece);
        assert_eq!(response.reason, WasteReason::Spoiled);
        assert_eq!(response.matched_keyword.as_deref(), Some("tomato"));
        assert!((response.estimated_value - 16.0).abs() < EPS);
        assert_eq!(response.wasted_on, "2026-01-15");

        let entry = get_waste_entry(&db, response.id).unwrap().unwrap();
        assert_eq!(entry.item_name, "Red Tomato");
    }

    #[test]
    fn test_log_waste_rejects_bad_input() {
        let db = setup();
        assert!(log_waste(&db, "", "1 kg", None, None, None, today()).is_err());
        assert!(log_waste(&db, "rice", "1 furlong", None, None, None, today()).is_err());
        assert!(log_waste(&db, "rice", "0 kg", None, None, None, today()).is_err());
        assert!(log_waste(&db, "rice", "1 kg", None, Some("last week"), None, today()).is_err());

        let listed = list_waste_entries(&db, None, None, 50, 0).unwrap();
        assert_eq!(listed.total, 0);
    }

    #[test]
    fn test_summary_over_range() {
        let db = setup();
        log_waste(&db, "rice", "500 g", Some("leftover"), Some("2026-01-02"), None, today()).unwrap();
        log_waste(&db, "tomato", "4", Some("spoiled"), Some("2026-01-10"), None, today()).unwrap();
        log_waste(&db, "tomato", "1", Some("spoiled"), Some("2026-02-01"), None, today()).unwrap();

        let january = waste_summary(&db, Some("2026-01-01"), Some("2026-01-31"), 5).unwrap();
        assert_eq!(january.entry_count, 2);
        // 5 portions of rice at 6 + 4 tomatoes at 8
        assert!((january.total_value - 62.0).abs() < EPS);
        assert_eq!(january.top_items[0].item_name, "tomato");
        assert_eq!(january.by_reason.len(), 2);

        let everything = waste_summary(&db, None, None, 5).unwrap();
        assert_eq!(everything.entry_count, 3);
    }

    #[test]
    fn test_delete_waste_entry() {
        let db = setup();
        let logged = log_waste(&db, "bread", "2 slices", None, None, None, today());
        // "slice" is not a known unit
        assert!(logged.is_err());

        let logged = log_waste(&db, "bread", "2", None, None, None, today()).unwrap();
        assert!(delete_waste_entry(&db, logged.id).unwrap().success);
        assert!(delete_waste_entry(&db, logged.id).is_err());
    }
}
