//! Quantity expression parsing
//!
//! Splits free-form amounts like "1 1/2 cups" or "500g" into a number and a unit.

use serde::{Deserialize, Serialize};

use super::error::{ConversionError, ConversionResult};

/// Unit assumed when an amount carries no unit ("3" means three pieces)
pub const DEFAULT_UNIT: &str = "piece";

/// A user-supplied amount of a named item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuantityExpression {
    pub quantity: f64,
    pub unit: String,
    pub item_name: String,
}

impl QuantityExpression {
    pub fn new(quantity: f64, unit: impl Into<String>, item_name: impl Into<String>) -> Self {
        Self {
            quantity,
            unit: unit.into(),
            item_name: item_name.into(),
        }
    }
}

/// Parse an amount string for the given item
///
/// Examples:
/// - "2 kg" -> 2.0 "kg"
/// - "500g" -> 500.0 "g"
/// - "1 1/2 cups" -> 1.5 "cups"
/// - "½ cup" -> 0.5 "cup"
/// - "3" -> 3.0 "piece"
pub fn parse_quantity_expression(text: &str, item_name: &str) -> ConversionResult<QuantityExpression> {
    let trimmed = text.trim();
    let invalid = || ConversionError::InvalidQuantity {
        input: text.to_string(),
    };

    let split_at = trimmed
        .char_indices()
        .find(|(_, c)| !is_number_char(*c))
        .map(|(i, _)| i)
        .unwrap_or(trimmed.len());
    let (number_part, unit_part) = trimmed.split_at(split_at);

    let quantity = parse_number(number_part).ok_or_else(invalid)?;

    let unit = unit_part.trim();
    let unit = if unit.is_empty() { DEFAULT_UNIT } else { unit };

    Ok(QuantityExpression::new(quantity, unit, item_name.trim()))
}

fn is_number_char(c: char) -> bool {
    c.is_ascii_digit() || c == '.' || c == '/' || c == ' ' || vulgar_fraction(c).is_some()
}

fn vulgar_fraction(c: char) -> Option<f64> {
    match c {
        '½' => Some(0.5),
        '¼' => Some(0.25),
        '¾' => Some(0.75),
        '⅓' => Some(1.0 / 3.0),
        '⅔' => Some(2.0 / 3.0),
        '⅛' => Some(0.125),
        _ => None,
    }
}

/// Whole number, decimal, fraction, or a mixed number like "1 1/2"
fn parse_number(s: &str) -> Option<f64> {
    let parts: Vec<&str> = s.split_whitespace().collect();
    match parts.as_slice() {
        [single] => parse_part(single),
        [whole, fraction] if is_fraction(fraction) => {
            let whole: f64 = whole.parse().ok()?;
            Some(whole + parse_part(fraction)?)
        }
        _ => None,
    }
}

fn is_fraction(s: &str) -> bool {
    s.contains('/') || s.chars().all(|c| vulgar_fraction(c).is_some())
}

fn parse_part(s: &str) -> Option<f64> {
    // "1½" style: digits followed by a single vulgar fraction
    if let Some(last) = s.chars().last() {
        if let Some(fraction) = vulgar_fraction(last) {
            let whole = &s[..s.len() - last.len_utf8()];
            let whole: f64 = if whole.is_empty() { 0.0 } else { whole.parse().ok()? };
            return Some(whole + fraction);
        }
    }

    if let Some((numerator, denominator)) = s.split_once('/') {
        let numerator: f64 = numerator.parse().ok()?;
        let denominator: f64 = denominator.parse().ok()?;
        if denominator == 0.0 {
            return None;
        }
        return Some(numerator / denominator);
    }

    s.parse().ok()
}
