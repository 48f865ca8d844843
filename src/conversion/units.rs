//! Unit types and conversion tables
//!
//! Static conversion categories. Every factor reads "1 unit = factor × base unit".

use std::fmt;

use serde::{Deserialize, Serialize};

/// Canonical unit that every conversion within a category funnels through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BaseUnit {
    /// Mass, stored in grams
    #[serde(rename = "g")]
    Gram,
    /// Volume, stored in milliliters
    #[serde(rename = "ml")]
    Milliliter,
    /// Generic count
    #[serde(rename = "piece")]
    Piece,
    /// Garlic cloves
    #[serde(rename = "clove")]
    Clove,
    /// Herb leaves
    #[serde(rename = "leaf")]
    Leaf,
}

impl BaseUnit {
    /// Unit token used in factor tables and storage
    pub fn as_str(&self) -> &'static str {
        match self {
            BaseUnit::Gram => "g",
            BaseUnit::Milliliter => "ml",
            BaseUnit::Piece => "piece",
            BaseUnit::Clove => "clove",
            BaseUnit::Leaf => "leaf",
        }
    }

    /// Parse from a token or long name
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "g" | "gram" | "grams" => Some(BaseUnit::Gram),
            "ml" | "milliliter" | "milliliters" | "millilitre" => Some(BaseUnit::Milliliter),
            "piece" | "pieces" | "pc" | "pcs" => Some(BaseUnit::Piece),
            "clove" | "cloves" => Some(BaseUnit::Clove),
            "leaf" | "leaves" => Some(BaseUnit::Leaf),
            _ => None,
        }
    }

    /// Amount of this unit that impact constants are quoted against.
    ///
    /// Count units are priced per unit; mass and volume per 100 g / 100 ml.
    pub fn reference_portion(&self) -> f64 {
        match self {
            BaseUnit::Gram | BaseUnit::Milliliter => 100.0,
            BaseUnit::Piece | BaseUnit::Clove | BaseUnit::Leaf => 1.0,
        }
    }
}

impl fmt::Display for BaseUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named group of interchangeable units sharing one base unit
#[derive(Debug, PartialEq)]
pub struct ConversionCategory {
    pub name: &'static str,
    pub base_unit: BaseUnit,
    /// Ordered `(unit token, factor)` pairs; tokens are lowercase and singular
    pub factors: &'static [(&'static str, f64)],
}

impl ConversionCategory {
    /// Factor for an already-normalized unit token
    pub fn factor(&self, unit: &str) -> Option<f64> {
        self.factors
            .iter()
            .find(|(name, _)| *name == unit)
            .map(|(_, factor)| *factor)
    }

    pub fn contains(&self, unit: &str) -> bool {
        self.factor(unit).is_some()
    }

    /// Unit tokens in declaration order
    pub fn units(&self) -> impl Iterator<Item = &'static str> {
        self.factors.iter().map(|(name, _)| *name)
    }
}

// ============================================================================
// Weight Conversion Constants (to grams)
// ============================================================================

/// Grams per milligram
pub const G_PER_MG: f64 = 0.001;
/// Grams per kilogram
pub const G_PER_KG: f64 = 1000.0;
/// Grams per ounce
pub const G_PER_OZ: f64 = 28.3495;
/// Grams per pound
pub const G_PER_LB: f64 = 453.592;

// ============================================================================
// Volume Conversion Constants (to milliliters)
// ============================================================================

/// Milliliters per teaspoon (metric)
pub const ML_PER_TSP: f64 = 5.0;
/// Milliliters per tablespoon (metric)
pub const ML_PER_TBSP: f64 = 15.0;
/// Milliliters per fluid ounce
pub const ML_PER_FL_OZ: f64 = 29.5735;
/// Milliliters per cup (metric recipe cup)
pub const ML_PER_CUP: f64 = 240.0;
/// Milliliters per pint (US)
pub const ML_PER_PINT: f64 = 473.176;
/// Milliliters per quart (US)
pub const ML_PER_QUART: f64 = 946.353;
/// Milliliters per liter
pub const ML_PER_LITER: f64 = 1000.0;
/// Milliliters per gallon (US)
pub const ML_PER_GALLON: f64 = 3785.41;

// ============================================================================
// Conversion Categories
// ============================================================================

pub static WEIGHT: ConversionCategory = ConversionCategory {
    name: "weight",
    base_unit: BaseUnit::Gram,
    factors: &[
        ("g", 1.0),
        ("gram", 1.0),
        ("kg", G_PER_KG),
        ("kilogram", G_PER_KG),
        ("kilo", G_PER_KG),
        ("mg", G_PER_MG),
        ("milligram", G_PER_MG),
        ("oz", G_PER_OZ),
        ("ounce", G_PER_OZ),
        ("lb", G_PER_LB),
        ("pound", G_PER_LB),
    ],
};

pub static VOLUME: ConversionCategory = ConversionCategory {
    name: "volume",
    base_unit: BaseUnit::Milliliter,
    factors: &[
        ("ml", 1.0),
        ("milliliter", 1.0),
        ("millilitre", 1.0),
        ("l", ML_PER_LITER),
        ("liter", ML_PER_LITER),
        ("litre", ML_PER_LITER),
        ("tsp", ML_PER_TSP),
        ("teaspoon", ML_PER_TSP),
        ("tbsp", ML_PER_TBSP),
        ("tablespoon", ML_PER_TBSP),
        ("fl oz", ML_PER_FL_OZ),
        ("cup", ML_PER_CUP),
        ("pint", ML_PER_PINT),
        ("quart", ML_PER_QUART),
        ("gallon", ML_PER_GALLON),
    ],
};

pub static QUANTITY: ConversionCategory = ConversionCategory {
    name: "quantity",
    base_unit: BaseUnit::Piece,
    factors: &[
        ("piece", 1.0),
        ("pc", 1.0),
        ("item", 1.0),
        ("each", 1.0),
        ("unit", 1.0),
        ("whole", 1.0),
        ("pair", 2.0),
        ("dozen", 12.0),
        ("tray", 30.0),
    ],
};

pub static GARLIC: ConversionCategory = ConversionCategory {
    name: "garlic",
    base_unit: BaseUnit::Clove,
    factors: &[("clove", 1.0), ("bulb", 10.0), ("head", 10.0)],
};

pub static HERBS: ConversionCategory = ConversionCategory {
    name: "herbs",
    base_unit: BaseUnit::Leaf,
    factors: &[("leaf", 1.0), ("sprig", 5.0), ("bunch", 30.0)],
};

/// Every known category, in search order
pub static CATEGORIES: [&ConversionCategory; 5] = [&WEIGHT, &VOLUME, &QUANTITY, &GARLIC, &HERBS];

/// Global maps consulted when the resolved category lacks a unit
pub static GLOBAL_FALLBACKS: [&ConversionCategory; 3] = [&WEIGHT, &VOLUME, &QUANTITY];

/// Normalize a unit string for table lookup.
///
/// Trims, lowercases and strips a single trailing "s". Irregular plurals such
/// as "leaves" are not handled.
pub fn normalize_unit_token(unit: &str) -> String {
    let lower = unit.trim().to_lowercase();
    match lower.strip_suffix('s') {
        Some(singular) => singular.to_string(),
        None => lower,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_unit_factor_is_one() {
        for category in CATEGORIES.iter() {
            assert_eq!(
                category.factor(category.base_unit.as_str()),
                Some(1.0),
                "category {} lacks its base unit",
                category.name
            );
        }
    }

    #[test]
    fn test_factors_positive() {
        for category in CATEGORIES.iter() {
            for (unit, factor) in category.factors {
                assert!(*factor > 0.0, "{}:{} has non-positive factor", category.name, unit);
            }
        }
    }

    #[test]
    fn test_tokens_are_normalized() {
        for category in CATEGORIES.iter() {
            for unit in category.units() {
                assert_eq!(unit, unit.to_lowercase());
                assert!(!unit.ends_with('s'), "{} would never match after plural stripping", unit);
            }
        }
    }

    #[test]
    fn test_normalize_unit_token() {
        assert_eq!(normalize_unit_token("Cups"), "cup");
        assert_eq!(normalize_unit_token("  KG "), "kg");
        assert_eq!(normalize_unit_token("lbs"), "lb");
        assert_eq!(normalize_unit_token("g"), "g");
        // Only one trailing "s" is removed
        assert_eq!(normalize_unit_token("pieces"), "piece");
        assert_eq!(normalize_unit_token("ss"), "s");
    }

    #[test]
    fn test_irregular_plural_not_handled() {
        assert_eq!(normalize_unit_token("leaves"), "leave");
        assert!(!HERBS.contains(&normalize_unit_token("leaves")));
    }

    #[test]
    fn test_base_unit_from_str() {
        assert_eq!(BaseUnit::from_str("G"), Some(BaseUnit::Gram));
        assert_eq!(BaseUnit::from_str("ml"), Some(BaseUnit::Milliliter));
        assert_eq!(BaseUnit::from_str("cloves"), Some(BaseUnit::Clove));
        assert_eq!(BaseUnit::from_str("cup"), None);
    }

    #[test]
    fn test_reference_portion() {
        assert_eq!(BaseUnit::Gram.reference_portion(), 100.0);
        assert_eq!(BaseUnit::Milliliter.reference_portion(), 100.0);
        assert_eq!(BaseUnit::Piece.reference_portion(), 1.0);
    }
}
