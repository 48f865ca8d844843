//! Pantry MCP Tools
//!
//! Tools for tracking food on hand, predicting expiry, and moving spoiled
//! items into the waste log.

use chrono::{Days, NaiveDate};
use rusqlite::Connection;
use serde::Serialize;

use super::{parse_date_or, DeleteResponse, DATE_FORMAT};
use crate::conversion::{
    denormalize_from_base_unit, normalize_to_base_unit, parse_quantity_expression, BaseUnit,
};
use crate::db::{Database, DbError, DbResult};
use crate::impact::{
    days_until_expiry, estimate_impact, impact_for_base_quantity, predict_expiry, summarize, ItemImpact,
};
use crate::models::{PantryItem, PantryItemCreate, WasteEntry, WasteEntryCreate, WasteReason};

/// Remaining base quantity treated as used up
const EMPTY_THRESHOLD: f64 = 1e-9;

/// Response for add_pantry_item
#[derive(Debug, Serialize)]
pub struct AddPantryItemResponse {
    pub id: i64,
    pub item_name: String,
    pub quantity: f64,
    pub unit: String,
    pub base_quantity: f64,
    pub base_unit: BaseUnit,
    pub estimated_value: f64,
    pub stored_on: String,
    pub expires_on: String,
    pub expiry_predicted: bool,
}

/// Pantry item with days left until expiry
#[derive(Debug, Serialize)]
pub struct PantryItemSummary {
    pub id: i64,
    pub item_name: String,
    pub quantity: f64,
    pub unit: String,
    pub estimated_value: f64,
    pub expires_on: String,
    pub days_until_expiry: Option<i64>,
    pub expired: bool,
}

impl PantryItemSummary {
    fn from_item(item: &PantryItem, today: NaiveDate) -> Self {
        let days = NaiveDate::parse_from_str(&item.expires_on, DATE_FORMAT)
            .ok()
            .map(|expires| days_until_expiry(expires, today));

        Self {
            id: item.id,
            item_name: item.item_name.clone(),
            quantity: item.quantity,
            unit: item.unit.clone(),
            estimated_value: item.estimated_value,
            expires_on: item.expires_on.clone(),
            days_until_expiry: days,
            expired: days.map(|d| d < 0).unwrap_or(false),
        }
    }
}

/// Full pantry item detail response
#[derive(Debug, Serialize)]
pub struct PantryItemDetail {
    #[serde(flatten)]
    pub item: PantryItem,
    pub days_until_expiry: Option<i64>,
}

/// Response for list_pantry_items
#[derive(Debug, Serialize)]
pub struct ListPantryItemsResponse {
    pub items: Vec<PantryItemSummary>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

/// Response for list_expiring_pantry_items
#[derive(Debug, Serialize)]
pub struct ExpiringPantryItemsResponse {
    pub cutoff_date: String,
    pub items: Vec<PantryItemSummary>,
    pub count: usize,
    pub value_at_risk: f64,
    pub carbon_at_risk_kg: f64,
}

/// Response for consume_pantry_item
#[derive(Debug, Serialize)]
pub struct ConsumePantryItemResponse {
    pub id: i64,
    pub removed: bool,
    pub remaining_quantity: f64,
    pub unit: String,
    pub remaining_base_quantity: f64,
    pub base_unit: BaseUnit,
    pub estimated_value: f64,
}

/// Response for discard_pantry_item
#[derive(Debug, Serialize)]
pub struct DiscardPantryItemResponse {
    pub pantry_item_id: i64,
    pub waste_entry_id: i64,
    pub item_name: String,
    pub reason: WasteReason,
    pub estimated_value: f64,
    pub estimated_carbon_kg: f64,
    pub wasted_on: String,
}

/// Add a pantry item, predicting its expiry unless one is supplied
pub fn add_pantry_item(
    db: &Database,
    item_name: &str,
    amount: &str,
    stored_on: Option<&str>,
    expires_on: Option<&str>,
    notes: Option<String>,
    today: NaiveDate,
) -> Result<AddPantryItemResponse, String> {
    let name = item_name.trim();
    if name.is_empty() {
        return Err("item_name cannot be empty".to_string());
    }

    let expr = parse_quantity_expression(amount, name).map_err(|e| e.to_string())?;
    if expr.quantity <= 0.0 {
        return Err("Pantry quantity must be greater than 0".to_string());
    }
    let impact = estimate_impact(&expr).map_err(|e| e.to_string())?;

    let stored = parse_date_or(stored_on, today)?;
    let predicted = predict_expiry(name, stored);
    let expires = parse_date_or(expires_on, predicted)?;
    let expiry_predicted = expires_on.map(str::trim).filter(|s| !s.is_empty()).is_none();

    let data = PantryItemCreate {
        item_name: expr.item_name,
        quantity: expr.quantity,
        unit: expr.unit,
        base_quantity: impact.base_quantity,
        estimated_value: impact.totals.value,
        stored_on: stored.format(DATE_FORMAT).to_string(),
        expires_on: expires.format(DATE_FORMAT).to_string(),
        notes,
    };

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let item = PantryItem::create(&conn, &data)
        .map_err(|e| format!("Failed to add pantry item: {}", e))?;
    tracing::info!("Added pantry item #{} '{}', expires {}", item.id, item.item_name, item.expires_on);

    Ok(AddPantryItemResponse {
        id: item.id,
        item_name: item.item_name,
        quantity: item.quantity,
        unit: item.unit,
        base_quantity: item.base_quantity.quantity,
        base_unit: item.base_quantity.unit,
        estimated_value: item.estimated_value,
        stored_on: item.stored_on,
        expires_on: item.expires_on,
        expiry_predicted,
    })
}

/// Get a pantry item by ID
pub fn get_pantry_item(db: &Database, id: i64, today: NaiveDate) -> Result<Option<PantryItemDetail>, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let item = PantryItem::get_by_id(&conn, id)
        .map_err(|e| format!("Failed to get pantry item: {}", e))?;

    Ok(item.map(|item| {
        let days = PantryItemSummary::from_item(&item, today).days_until_expiry;
        PantryItemDetail {
            item,
            days_until_expiry: days,
        }
    }))
}

/// List pantry items with optional name filter and pagination
pub fn list_pantry_items(
    db: &Database,
    query: Option<&str>,
    limit: i64,
    offset: i64,
    today: NaiveDate,
) -> Result<ListPantryItemsResponse, String> {
    let limit = limit.clamp(1, 200);
    let offset = offset.max(0);
    let query = query.map(str::trim).filter(|q| !q.is_empty());

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let items = PantryItem::list(&conn, query, limit, offset)
        .map_err(|e| format!("Failed to list pantry items: {}", e))?;
    let total = PantryItem::count(&conn, query)
        .map_err(|e| format!("Failed to count pantry items: {}", e))?;

    Ok(ListPantryItemsResponse {
        items: items.iter().map(|item| PantryItemSummary::from_item(item, today)).collect(),
        total,
        limit,
        offset,
    })
}

/// Items expiring within `within_days` of today, including already expired ones
pub fn list_expiring_pantry_items(
    db: &Database,
    within_days: i64,
    today: NaiveDate,
) -> Result<ExpiringPantryItemsResponse, String> {
    let cutoff = today
        .checked_add_days(Days::new(within_days.max(0) as u64))
        .ok_or_else(|| format!("within_days out of range: {}", within_days))?;
    let cutoff_date = cutoff.format(DATE_FORMAT).to_string();

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let items = PantryItem::expiring_by(&conn, &cutoff_date)
        .map_err(|e| format!("Failed to list expiring items: {}", e))?;

    let impacts: Vec<ItemImpact> = items
        .iter()
        .map(|item| impact_for_base_quantity(&item.item_name, item.base_quantity))
        .collect();
    let at_risk = summarize(&impacts);

    let items: Vec<PantryItemSummary> = items
        .iter()
        .map(|item| PantryItemSummary::from_item(item, today))
        .collect();

    Ok(ExpiringPantryItemsResponse {
        cutoff_date,
        count: at_risk.item_count,
        items,
        value_at_risk: at_risk.totals.value,
        carbon_at_risk_kg: at_risk.totals.carbon_kg,
    })
}

/// Use up part of a pantry item; the amount may be in any unit of the same dimension
///
/// The read and the write share one transaction so concurrent calls both deduct.
pub fn consume_pantry_item(db: &Database, id: i64, amount: &str) -> Result<ConsumePantryItemResponse, String> {
    db.with_transaction(|tx| {
        let Some(item) = PantryItem::get_by_id(tx, id)? else {
            return Ok(Err(format!("Pantry item not found with id: {}", id)));
        };
        match plan_consumption(&item, amount) {
            Ok(plan) => apply_consumption(tx, item, plan).map(Ok),
            Err(e) => Ok(Err(e)),
        }
    })
    .map_err(|e| format!("Failed to consume pantry item: {}", e))?
}

/// Remaining base quantity after taking `amount`, or `None` when nothing is left
fn plan_consumption(item: &PantryItem, amount: &str) -> Result<Option<f64>, String> {
    let expr = parse_quantity_expression(amount, &item.item_name).map_err(|e| e.to_string())?;
    if expr.quantity <= 0.0 {
        return Err("Consumed amount must be greater than 0".to_string());
    }
    let used = normalize_to_base_unit(expr.quantity, &expr.unit, &item.item_name).map_err(|e| e.to_string())?;

    if used.unit != item.base_quantity.unit {
        return Err(format!(
            "Cannot take '{}' from {} tracked in {}",
            amount.trim(),
            item.item_name,
            item.base_quantity.unit
        ));
    }

    let remaining = item.base_quantity.quantity - used.quantity;
    Ok((remaining > EMPTY_THRESHOLD).then_some(remaining))
}

fn apply_consumption(
    conn: &Connection,
    item: PantryItem,
    remaining: Option<f64>,
) -> DbResult<ConsumePantryItemResponse> {
    let Some(remaining) = remaining else {
        PantryItem::delete(conn, item.id)?;
        return Ok(ConsumePantryItemResponse {
            id: item.id,
            removed: true,
            remaining_quantity: 0.0,
            unit: item.unit,
            remaining_base_quantity: 0.0,
            base_unit: item.base_quantity.unit,
            estimated_value: 0.0,
        });
    };

    // The stored unit was accepted on insert, so it maps back onto the base unit
    let quantity = denormalize_from_base_unit(remaining, item.base_quantity.unit, &item.unit, &item.item_name)
        .map(|display| display.quantity)
        .unwrap_or(item.quantity * remaining / item.base_quantity.quantity);
    let estimated_value = if item.base_quantity.quantity > 0.0 {
        item.estimated_value * remaining / item.base_quantity.quantity
    } else {
        0.0
    };

    let updated = PantryItem::update_quantity(conn, item.id, quantity, remaining, estimated_value)?
        .ok_or(DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows))?;

    Ok(ConsumePantryItemResponse {
        id: updated.id,
        removed: false,
        remaining_quantity: updated.quantity,
        unit: updated.unit,
        remaining_base_quantity: updated.base_quantity.quantity,
        base_unit: updated.base_quantity.unit,
        estimated_value: updated.estimated_value,
    })
}

/// Move a pantry item into the waste log
///
/// Without an explicit reason, items past their expiry are logged as expired.
pub fn discard_pantry_item(
    db: &Database,
    id: i64,
    reason: Option<&str>,
    notes: Option<String>,
    today: NaiveDate,
) -> Result<DiscardPantryItemResponse, String> {
    let entry = db
        .with_transaction(|tx| {
            let Some(item) = PantryItem::get_by_id(tx, id)? else {
                return Ok(None);
            };

            let expired = NaiveDate::parse_from_str(&item.expires_on, DATE_FORMAT)
                .map(|expires| expires < today)
                .unwrap_or(false);
            let reason = match reason {
                Some(r) => WasteReason::from_str(r),
                None if expired => WasteReason::Expired,
                None => WasteReason::Other,
            };

            let impact = impact_for_base_quantity(&item.item_name, item.base_quantity);
            let data = WasteEntryCreate {
                item_name: item.item_name.clone(),
                quantity: item.quantity,
                unit: item.unit.clone(),
                reason,
                wasted_on: today.format(DATE_FORMAT).to_string(),
                notes,
            };

            let entry = WasteEntry::create(tx, &data, &impact)?;
            PantryItem::delete(tx, id)?;
            Ok(Some(entry))
        })
        .map_err(|e| format!("Failed to discard pantry item: {}", e))?
        .ok_or_else(|| format!("Pantry item not found with id: {}", id))?;

    tracing::info!(
        "Discarded pantry item #{} as waste #{} ({})",
        id,
        entry.id,
        entry.reason.as_str()
    );

    Ok(DiscardPantryItemResponse {
        pantry_item_id: id,
        waste_entry_id: entry.id,
        item_name: entry.item_name,
        reason: entry.reason,
        estimated_value: entry.totals.value,
        estimated_carbon_kg: entry.totals.carbon_kg,
        wasted_on: entry.wasted_on,
    })
}

/// Delete a pantry item without logging waste
pub fn delete_pantry_item(db: &Database, id: i64) -> Result<DeleteResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let deleted = PantryItem::delete(&conn, id)
        .map_err(|e| format!("Failed to delete pantry item: {}", e))?;
    if !deleted {
        return Err(format!("Pantry item not found with id: {}", id));
    }

    Ok(DeleteResponse {
        success: true,
        deleted_id: id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::waste::list_waste_entries;

    const EPS: f64 = 1e-9;

    fn setup() -> Database {
        Database::in_memory().unwrap()
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, DATE_FORMAT).unwrap()
    }

    #[test]
    fn test_add_predicts_expiry() {
        let db = setup();
        let response = add_pantry_item(&db, "tomato", "6", None, None, None, date("2026-03-01")).unwrap();
        assert!(response.expiry_predicted);
        assert_eq!(response.stored_on, "2026-03-01");
        assert_eq!(response.expires_on, "2026-03-11");
        assert!((response.estimated_value - 48.0).abs() < EPS);
    }

    #[test]
    fn test_add_with_explicit_expiry() {
        let db = setup();
        let response = add_pantry_item(
            &db,
            "milk",
            "1 liter",
            Some("2026-03-01"),
            Some("2026-03-04"),
            None,
            date("2026-03-02"),
        )
        .unwrap();
        assert!(!response.expiry_predicted);
        assert_eq!(response.expires_on, "2026-03-04");
        assert_eq!(response.base_unit, BaseUnit::Milliliter);
    }

    #[test]
    fn test_list_and_expiring() {
        let db = setup();
        let today = date("2026-03-01");
        add_pantry_item(&db, "fish", "500 g", None, None, None, today).unwrap();
        add_pantry_item(&db, "rice", "5 kg", None, None, None, today).unwrap();
        add_pantry_item(&db, "milk", "1 l", Some("2026-02-20"), None, None, today).unwrap();

        let listed = list_pantry_items(&db, None, 50, 0, today).unwrap();
        assert_eq!(listed.total, 3);
        // milk stored 02-20 expires 02-27, already past
        assert_eq!(listed.items[0].item_name, "milk");
        assert!(listed.items[0].expired);
        assert_eq!(listed.items[0].days_until_expiry, Some(-2));

        let filtered = list_pantry_items(&db, Some("rice"), 50, 0, today).unwrap();
        assert_eq!(filtered.items.len(), 1);
        assert_eq!(filtered.total, 1);

        let expiring = list_expiring_pantry_items(&db, 3, today).unwrap();
        assert_eq!(expiring.count, 2);
        assert_eq!(expiring.cutoff_date, "2026-03-04");
        // 5 portions of fish at 20 + 10 portions of milk at 10
        assert!((expiring.value_at_risk - 200.0).abs() < EPS);
        // 5 × 0.5 kg for fish + 10 × 0.13 kg for milk
        assert!((expiring.carbon_at_risk_kg - 3.8).abs() < 1e-6);
    }

    #[test]
    fn test_consume_in_other_unit() {
        let db = setup();
        let today = date("2026-03-01");
        let added = add_pantry_item(&db, "rice", "2 kg", None, None, None, today).unwrap();

        let response = consume_pantry_item(&db, added.id, "500 g").unwrap();
        assert!(!response.removed);
        assert!((response.remaining_quantity - 1.5).abs() < EPS);
        assert_eq!(response.unit, "kg");
        assert!((response.remaining_base_quantity - 1500.0).abs() < EPS);
        assert!((response.estimated_value - 90.0).abs() < EPS);

        let err = consume_pantry_item(&db, added.id, "2 pieces").unwrap_err();
        assert!(err.contains("Cannot take"));

        let response = consume_pantry_item(&db, added.id, "1.5 kg").unwrap();
        assert!(response.removed);
        assert!(get_pantry_item(&db, added.id, today).unwrap().is_none());
    }

    #[test]
    fn test_expiring_window_out_of_range() {
        let db = setup();
        let err = list_expiring_pantry_items(&db, 1_000_000_000, date("2026-03-01")).unwrap_err();
        assert!(err.contains("within_days out of range"));

        let negative = list_expiring_pantry_items(&db, -5, date("2026-03-01")).unwrap();
        assert_eq!(negative.cutoff_date, "2026-03-01");
    }

    #[test]
    fn test_consume_rejects_non_positive_amount() {
        let db = setup();
        let today = date("2026-03-01");
        let added = add_pantry_item(&db, "rice", "2 kg", None, None, None, today).unwrap();

        let err = consume_pantry_item(&db, added.id, "0 kg").unwrap_err();
        assert!(err.contains("greater than 0"));

        let item = get_pantry_item(&db, added.id, today).unwrap().unwrap();
        assert!((item.item.base_quantity.quantity - 2000.0).abs() < EPS);
    }

    #[test]
    fn test_concurrent_consume_deducts_every_call() {
        let dir = std::env::temp_dir().join(format!("scrapless-consume-{}", std::process::id()));
        let db = Database::open(dir.join("scrapless.db")).unwrap();
        let added = add_pantry_item(&db, "rice", "2 kg", None, None, None, date("2026-03-01")).unwrap();

        let workers: Vec<_> = (0..4)
            .map(|_| {
                let db = db.clone();
                std::thread::spawn(move || {
                    for _ in 0..5 {
                        consume_pantry_item(&db, added.id, "50 g").unwrap();
                    }
                })
            })
            .collect();
        for worker in workers {
            worker.join().unwrap();
        }

        let item = get_pantry_item(&db, added.id, date("2026-03-01")).unwrap().unwrap();
        assert!((item.item.base_quantity.quantity - 1000.0).abs() < EPS);

        drop(db);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_discard_moves_to_waste() {
        let db = setup();
        let added = add_pantry_item(&db, "banana", "3", Some("2026-03-01"), None, None, date("2026-03-01")).unwrap();

        // Past the 5 day shelf life
        let response = discard_pantry_item(&db, added.id, None, None, date("2026-03-10")).unwrap();
        assert_eq!(response.reason, WasteReason::Expired);
        assert!((response.estimated_value - 24.0).abs() < EPS);
        assert_eq!(response.wasted_on, "2026-03-10");

        assert!(get_pantry_item(&db, added.id, date("2026-03-10")).unwrap().is_none());
        let waste = list_waste_entries(&db, None, None, 50, 0).unwrap();
        assert_eq!(waste.total, 1);
        assert_eq!(waste.entries[0].item_name, "banana");

        assert!(discard_pantry_item(&db, added.id, None, None, date("2026-03-10")).is_err());
    }

    #[test]
    fn test_discard_with_reason() {
        let db = setup();
        let added = add_pantry_item(&db, "bread", "4", None, None, None, date("2026-03-01")).unwrap();
        let response = discard_pantry_item(&db, added.id, Some("moldy"), None, date("2026-03-02")).unwrap();
        assert_eq!(response.reason, WasteReason::Spoiled);
    }

    #[test]
    fn test_delete_pantry_item() {
        let db = setup();
        let added = add_pantry_item(&db, "onion", "1 kg", None, None, None, date("2026-03-01")).unwrap();
        assert!(delete_pantry_item(&db, added.id).is_ok());
        assert!(delete_pantry_item(&db, added.id).is_err());
    }
}
