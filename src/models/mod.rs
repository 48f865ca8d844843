//! Data models
//!
//! Rust structs representing database entities.

mod pantry_item;
mod waste_entry;

pub use pantry_item::{PantryItem, PantryItemCreate};
pub use waste_entry::{WasteEntry, WasteEntryCreate, WasteItemTotal, WasteReason, WasteReasonTotal};

use rusqlite::types::Type;
use rusqlite::Row;

use crate::conversion::BaseUnit;

/// Read a stored base unit token
fn base_unit_from_row(row: &Row, column: &str) -> rusqlite::Result<BaseUnit> {
    let token: String = row.get(column)?;
    BaseUnit::from_str(&token).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            Type::Text,
            format!("unknown base unit '{}'", token).into(),
        )
    })
}
