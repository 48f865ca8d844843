//! Scrapless Tools module
//!
//! MCP tool implementations for the Scrapless engine.

pub mod conversions;
pub mod pantry;
pub mod status;
pub mod waste;

use chrono::NaiveDate;
use serde::Serialize;

/// ISO date format used for every stored date
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Response for successful deletes
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
    pub deleted_id: i64,
}

/// Current local date
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Parse an optional ISO date, falling back to `default`
pub fn parse_date_or(value: Option<&str>, default: NaiveDate) -> Result<NaiveDate, String> {
    match value.map(str::trim).filter(|s| !s.is_empty()) {
        Some(s) => NaiveDate::parse_from_str(s, DATE_FORMAT)
            .map_err(|e| format!("Invalid date '{}' (expected YYYY-MM-DD): {}", s, e)),
        None => Ok(default),
    }
}

/// Validate an optional ISO date filter, keeping it as a string
pub fn validate_date_filter(value: Option<&str>) -> Result<Option<String>, String> {
    match value.map(str::trim).filter(|s| !s.is_empty()) {
        Some(s) => NaiveDate::parse_from_str(s, DATE_FORMAT)
            .map(|d| Some(d.format(DATE_FORMAT).to_string()))
            .map_err(|e| format!("Invalid date '{}' (expected YYYY-MM-DD): {}", s, e)),
        None => Ok(None),
    }
}
