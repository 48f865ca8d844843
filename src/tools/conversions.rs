//! Conversion and Impact MCP Tools
//!
//! Stateless tools over the conversion tables and impact lookup.

use chrono::NaiveDate;
use serde::Serialize;

use super::DATE_FORMAT;
use crate::conversion::{
    self, denormalize_from_base_unit, normalize_to_base_unit, parse_quantity_expression,
    resolve_category, BaseUnit,
};
use crate::impact::{self, find_impact, DEFAULT_IMPACT};

/// Response for normalize_quantity
#[derive(Debug, Serialize)]
pub struct NormalizeResponse {
    pub item_name: String,
    pub quantity: f64,
    pub unit: String,
    pub category: &'static str,
    pub base_quantity: f64,
    pub base_unit: BaseUnit,
}

/// Response for denormalize_quantity and convert_quantity
#[derive(Debug, Serialize)]
pub struct ConvertResponse {
    pub item_name: String,
    pub from_quantity: f64,
    pub from_unit: String,
    pub quantity: f64,
    pub unit: String,
}

/// Response for lookup_impact
#[derive(Debug, Serialize)]
pub struct ImpactLookupResponse {
    pub item_name: String,
    pub matched_keyword: Option<String>,
    pub is_default: bool,
    pub unit_value: f64,
    pub carbon_footprint_per_unit: f64,
    pub shelf_life_days: u32,
}

/// Response for estimate_impact
#[derive(Debug, Serialize)]
pub struct EstimateImpactResponse {
    pub item_name: String,
    pub quantity: f64,
    pub unit: String,
    pub base_quantity: f64,
    pub base_unit: BaseUnit,
    pub matched_keyword: Option<String>,
    pub total_value: f64,
    pub total_carbon_kg: f64,
    pub predicted_expiry: String,
}

fn require_item_name(item_name: &str) -> Result<&str, String> {
    let name = item_name.trim();
    if name.is_empty() {
        return Err("item_name cannot be empty".to_string());
    }
    Ok(name)
}

/// Convert a quantity into its base unit
pub fn normalize_quantity(item_name: &str, quantity: f64, unit: &str) -> Result<NormalizeResponse, String> {
    let name = require_item_name(item_name)?;
    let base = normalize_to_base_unit(quantity, unit, name).map_err(|e| e.to_string())?;

    Ok(NormalizeResponse {
        item_name: name.to_string(),
        quantity,
        unit: unit.trim().to_string(),
        category: resolve_category(name).name,
        base_quantity: base.quantity,
        base_unit: base.unit,
    })
}

/// Convert a base-unit quantity into a display unit
pub fn denormalize_quantity(
    item_name: &str,
    quantity: f64,
    base_unit: &str,
    target_unit: &str,
) -> Result<ConvertResponse, String> {
    let name = require_item_name(item_name)?;
    let base = BaseUnit::from_str(base_unit).ok_or_else(|| {
        format!("Unknown base unit '{}' (expected g, ml, piece, clove or leaf)", base_unit)
    })?;

    let display = denormalize_from_base_unit(quantity, base, target_unit, name).map_err(|e| e.to_string())?;

    Ok(ConvertResponse {
        item_name: name.to_string(),
        from_quantity: quantity,
        from_unit: base.as_str().to_string(),
        quantity: display.quantity,
        unit: display.unit,
    })
}

/// Convert between two display units
pub fn convert_quantity(
    item_name: &str,
    quantity: f64,
    from_unit: &str,
    to_unit: &str,
) -> Result<ConvertResponse, String> {
    let name = require_item_name(item_name)?;
    let display = conversion::convert_quantity(quantity, from_unit, to_unit, name).map_err(|e| e.to_string())?;

    Ok(ConvertResponse {
        item_name: name.to_string(),
        from_quantity: quantity,
        from_unit: from_unit.trim().to_string(),
        quantity: display.quantity,
        unit: display.unit,
    })
}

/// Look up impact constants; unmatched names report the default record
pub fn lookup_impact(item_name: &str) -> ImpactLookupResponse {
    let (matched_keyword, record) = match find_impact(item_name) {
        Some((keyword, record)) => (Some(keyword.to_string()), record),
        None => (None, DEFAULT_IMPACT),
    };

    ImpactLookupResponse {
        item_name: item_name.trim().to_string(),
        is_default: matched_keyword.is_none(),
        matched_keyword,
        unit_value: record.unit_value,
        carbon_footprint_per_unit: record.carbon_footprint_per_unit,
        shelf_life_days: record.shelf_life_days,
    }
}

/// Estimate value and carbon for an amount like "2 kg"
pub fn estimate_impact(item_name: &str, amount: &str, today: NaiveDate) -> Result<EstimateImpactResponse, String> {
    let name = require_item_name(item_name)?;
    let expr = parse_quantity_expression(amount, name).map_err(|e| e.to_string())?;
    let estimate = impact::estimate_impact(&expr).map_err(|e| e.to_string())?;

    Ok(EstimateImpactResponse {
        item_name: expr.item_name,
        quantity: expr.quantity,
        unit: expr.unit,
        base_quantity: estimate.base_quantity.quantity,
        base_unit: estimate.base_quantity.unit,
        matched_keyword: estimate.matched_keyword,
        total_value: estimate.totals.value,
        total_carbon_kg: estimate.totals.carbon_kg,
        predicted_expiry: impact::predict_expiry(name, today).format(DATE_FORMAT).to_string(),
    })
}
