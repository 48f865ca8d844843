//! Static impact table
//!
//! Per-portion value (PHP), carbon footprint (kg CO2e) and shelf life for food
//! keywords. A portion is one unit for count-based items and 100 g / 100 ml
//! for mass and volume (see [`BaseUnit::reference_portion`]).
//!
//! [`BaseUnit::reference_portion`]: crate::conversion::BaseUnit::reference_portion

use serde::{Deserialize, Serialize};

/// Economic and environmental constants for one food keyword
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImpactRecord {
    /// Peso value per reference portion
    pub unit_value: f64,
    /// kg CO2-equivalent per reference portion
    pub carbon_footprint_per_unit: f64,
    pub shelf_life_days: u32,
}

impl ImpactRecord {
    pub const fn new(unit_value: f64, carbon_footprint_per_unit: f64, shelf_life_days: u32) -> Self {
        Self {
            unit_value,
            carbon_footprint_per_unit,
            shelf_life_days,
        }
    }
}

/// Record used when no keyword matches
pub const DEFAULT_IMPACT: ImpactRecord = ImpactRecord::new(5.0, 0.1, 7);

/// Keyword table, scanned in order; the first keyword contained in the item
/// name wins. Longer names that embed a shorter keyword ("pineapple" and
/// "apple", "eggplant" and "egg") must come first.
pub static IMPACT_TABLE: &[(&str, ImpactRecord)] = &[
    ("pineapple", ImpactRecord::new(60.0, 0.5, 5)),
    ("apple", ImpactRecord::new(25.0, 0.05, 30)),
    ("banana", ImpactRecord::new(8.0, 0.07, 5)),
    ("mango", ImpactRecord::new(30.0, 0.1, 5)),
    ("tomato", ImpactRecord::new(8.0, 0.03, 10)),
    ("eggplant", ImpactRecord::new(15.0, 0.04, 7)),
    ("egg", ImpactRecord::new(9.0, 0.2, 21)),
    ("onion", ImpactRecord::new(6.0, 0.03, 30)),
    ("garlic", ImpactRecord::new(3.0, 0.01, 90)),
    ("potato", ImpactRecord::new(8.0, 0.03, 21)),
    ("carrot", ImpactRecord::new(5.0, 0.02, 21)),
    ("cabbage", ImpactRecord::new(50.0, 0.2, 14)),
    ("lettuce", ImpactRecord::new(40.0, 0.15, 5)),
    ("rice", ImpactRecord::new(6.0, 0.4, 180)),
    ("noodle", ImpactRecord::new(15.0, 0.1, 180)),
    ("bread", ImpactRecord::new(7.0, 0.08, 5)),
    ("chicken", ImpactRecord::new(25.0, 0.6, 2)),
    ("pork", ImpactRecord::new(35.0, 0.7, 3)),
    ("beef", ImpactRecord::new(50.0, 2.7, 3)),
    ("fish", ImpactRecord::new(20.0, 0.5, 2)),
    ("milk", ImpactRecord::new(10.0, 0.13, 7)),
    ("cheese", ImpactRecord::new(40.0, 1.3, 21)),
];
