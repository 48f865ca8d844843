//! Impact estimation
//!
//! Combines normalized quantities with impact constants to value logged items
//! and predict expiration dates.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use super::lookup::find_impact;
use super::table::{ImpactRecord, DEFAULT_IMPACT};
use crate::conversion::{normalize_to_base_unit, ConversionResult, ConvertedQuantity, QuantityExpression};

/// Monetary and carbon totals
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ImpactTotals {
    /// Pesos
    pub value: f64,
    /// kg CO2e
    pub carbon_kg: f64,
}

impl ImpactTotals {
    pub fn zero() -> Self {
        Self::default()
    }

    /// Scale both totals by a multiplier
    pub fn scale(&self, multiplier: f64) -> Self {
        Self {
            value: self.value * multiplier,
            carbon_kg: self.carbon_kg * multiplier,
        }
    }

    pub fn add(&self, other: &ImpactTotals) -> Self {
        Self {
            value: self.value + other.value,
            carbon_kg: self.carbon_kg + other.carbon_kg,
        }
    }
}

impl std::ops::Add for ImpactTotals {
    type Output = ImpactTotals;

    fn add(self, other: ImpactTotals) -> ImpactTotals {
        ImpactTotals::add(&self, &other)
    }
}

impl std::ops::Mul<f64> for ImpactTotals {
    type Output = ImpactTotals;

    fn mul(self, multiplier: f64) -> ImpactTotals {
        self.scale(multiplier)
    }
}

impl std::iter::Sum for ImpactTotals {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(ImpactTotals::zero(), |acc, t| acc + t)
    }
}

/// Estimated impact of one logged item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemImpact {
    pub item_name: String,
    pub base_quantity: ConvertedQuantity,
    /// Keyword that supplied the record, `None` when the default was used
    pub matched_keyword: Option<String>,
    pub record: ImpactRecord,
    pub totals: ImpactTotals,
}

/// Value an already-normalized quantity of an item
///
/// Totals are `base quantity / reference portion × per-portion constant`, so
/// 250 g of rice counts as 2.5 portions and 3 eggs as 3.
pub fn impact_for_base_quantity(item_name: &str, base_quantity: ConvertedQuantity) -> ItemImpact {
    let (matched_keyword, record) = match find_impact(item_name) {
        Some((keyword, record)) => (Some(keyword.to_string()), record),
        None => (None, DEFAULT_IMPACT),
    };

    let portions = base_quantity.quantity / base_quantity.unit.reference_portion();
    let per_portion = ImpactTotals {
        value: record.unit_value,
        carbon_kg: record.carbon_footprint_per_unit,
    };

    ItemImpact {
        item_name: item_name.to_string(),
        base_quantity,
        matched_keyword,
        record,
        totals: per_portion * portions,
    }
}

/// Normalize a quantity expression and value it
pub fn estimate_impact(expr: &QuantityExpression) -> ConversionResult<ItemImpact> {
    let base = normalize_to_base_unit(expr.quantity, &expr.unit, &expr.item_name)?;
    Ok(impact_for_base_quantity(&expr.item_name, base))
}

/// Predicted expiration date for an item stored on the given day
///
/// Saturates at the last representable date.
pub fn predict_expiry(item_name: &str, stored_on: NaiveDate) -> NaiveDate {
    let shelf_life = super::lookup::lookup_impact(item_name).shelf_life_days;
    stored_on
        .checked_add_days(Days::new(u64::from(shelf_life)))
        .unwrap_or(NaiveDate::MAX)
}

/// Days from `today` until `expires_on`; negative once expired
pub fn days_until_expiry(expires_on: NaiveDate, today: NaiveDate) -> i64 {
    (expires_on - today).num_days()
}

/// Aggregate over a set of item impacts
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImpactSummary {
    pub item_count: usize,
    pub totals: ImpactTotals,
}

/// Count and total a set of item impacts
pub fn summarize<'a, I>(impacts: I) -> ImpactSummary
where
    I: IntoIterator<Item = &'a ItemImpact>,
{
    impacts
        .into_iter()
        .fold(ImpactSummary::default(), |acc, impact| ImpactSummary {
            item_count: acc.item_count + 1,
            totals: acc.totals + impact.totals,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversion::{BaseUnit, ConversionError};

    const EPS: f64 = 1e-9;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_count_item_per_piece() {
        let impact = estimate_impact(&QuantityExpression::new(2.0, "pieces", "Red Tomato")).unwrap();
        assert_eq!(impact.base_quantity.unit, BaseUnit::Piece);
        assert_eq!(impact.matched_keyword.as_deref(), Some("tomato"));
        assert!((impact.totals.value - 16.0).abs() < EPS);
        assert!((impact.totals.carbon_kg - 0.06).abs() < EPS);
    }

    #[test]
    fn test_mass_item_per_hundred_grams() {
        let impact = estimate_impact(&QuantityExpression::new(1.0, "kg", "rice")).unwrap();
        assert_eq!(impact.base_quantity.unit, BaseUnit::Gram);
        // 1000 g = 10 portions of 100 g
        assert!((impact.totals.value - 60.0).abs() < EPS);
        assert!((impact.totals.carbon_kg - 4.0).abs() < EPS);
    }

    #[test]
    fn test_default_record_used() {
        let impact = estimate_impact(&QuantityExpression::new(3.0, "piece", "xylophone")).unwrap();
        assert!(impact.matched_keyword.is_none());
        assert_eq!(impact.record, DEFAULT_IMPACT);
        assert!((impact.totals.value - 15.0).abs() < EPS);
    }

    #[test]
    fn test_unknown_unit_propagates() {
        let err = estimate_impact(&QuantityExpression::new(1.0, "furlong", "rice")).unwrap_err();
        assert!(matches!(err, ConversionError::UnrecognizedUnit { .. }));
    }

    #[test]
    fn test_predict_expiry() {
        assert_eq!(predict_expiry("Red Tomato", date("2026-03-01")), date("2026-03-11"));
        assert_eq!(predict_expiry("xylophone", date("2026-12-28")), date("2027-01-04"));
    }

    #[test]
    fn test_predict_expiry_saturates() {
        assert_eq!(predict_expiry("rice", NaiveDate::MAX), NaiveDate::MAX);
    }

    #[test]
    fn test_days_until_expiry() {
        assert_eq!(days_until_expiry(date("2026-03-11"), date("2026-03-01")), 10);
        assert_eq!(days_until_expiry(date("2026-03-01"), date("2026-03-03")), -2);
    }

    #[test]
    fn test_summarize() {
        let impacts = vec![
            estimate_impact(&QuantityExpression::new(2.0, "piece", "tomato")).unwrap(),
            estimate_impact(&QuantityExpression::new(500.0, "g", "rice")).unwrap(),
        ];
        let summary = summarize(&impacts);
        assert_eq!(summary.item_count, 2);
        assert!((summary.totals.value - (16.0 + 30.0)).abs() < EPS);

        let none: Vec<ItemImpact> = Vec::new();
        let empty = summarize(&none);
        assert_eq!(empty.item_count, 0);
        assert_eq!(empty.totals, ImpactTotals::zero());
    }

    #[test]
    fn test_totals_sum() {
        let total: ImpactTotals = vec![
            ImpactTotals { value: 1.0, carbon_kg: 0.5 },
            ImpactTotals { value: 2.0, carbon_kg: 0.25 },
        ]
        .into_iter()
        .sum();
        assert!((total.value - 3.0).abs() < EPS);
        assert!((total.carbon_kg - 0.75).abs() < EPS);
    }
}
