//! Unit conversion functions
//!
//! Normalization into base units and denormalization back into display units.

use serde::{Deserialize, Serialize};

use super::error::{ConversionError, ConversionResult};
use super::resolver::resolve_category;
use super::units::{normalize_unit_token, BaseUnit, CATEGORIES, GLOBAL_FALLBACKS};

/// A quantity expressed in a category's base unit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConvertedQuantity {
    pub quantity: f64,
    pub unit: BaseUnit,
}

/// A quantity expressed in a caller-requested display unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayQuantity {
    pub quantity: f64,
    pub unit: String,
}

/// Convert a quantity in the given unit to its base-unit equivalent
///
/// The unit is looked up in the category resolved for `item_name` first, then
/// in the global weight, volume and quantity maps. The result is exactly
/// `quantity * factor`; sign and magnitude are not validated.
pub fn normalize_to_base_unit(
    quantity: f64,
    unit: &str,
    item_name: &str,
) -> ConversionResult<ConvertedQuantity> {
    let category = resolve_category(item_name);
    let token = normalize_unit_token(unit);

    if let Some(factor) = category.factor(&token) {
        return Ok(ConvertedQuantity {
            quantity: quantity * factor,
            unit: category.base_unit,
        });
    }

    for fallback in GLOBAL_FALLBACKS.iter() {
        if let Some(factor) = fallback.factor(&token) {
            tracing::debug!(
                "'{}' not in {} category for '{}', using global {} map",
                token,
                category.name,
                item_name,
                fallback.name
            );
            return Ok(ConvertedQuantity {
                quantity: quantity * factor,
                unit: fallback.base_unit,
            });
        }
    }

    Err(ConversionError::UnrecognizedUnit {
        unit: unit.to_string(),
        item_name: item_name.to_string(),
    })
}

/// Convert a base-unit quantity into the requested display unit
///
/// When the category resolved for `item_name` uses a different base unit, any
/// category sharing `base_unit` that knows `target_unit` is used instead.
pub fn denormalize_from_base_unit(
    quantity: f64,
    base_unit: BaseUnit,
    target_unit: &str,
    item_name: &str,
) -> ConversionResult<DisplayQuantity> {
    let resolved = resolve_category(item_name);
    let token = normalize_unit_token(target_unit);

    let category = if resolved.base_unit == base_unit {
        resolved
    } else {
        CATEGORIES
            .iter()
            .copied()
            .find(|category| category.base_unit == base_unit && category.contains(&token))
            .ok_or_else(|| ConversionError::MismatchedUnitType {
                base_unit,
                target_unit: target_unit.to_string(),
                item_name: item_name.to_string(),
            })?
    };

    let factor = category
        .factor(&token)
        .ok_or_else(|| ConversionError::UnrecognizedUnit {
            unit: target_unit.to_string(),
            item_name: item_name.to_string(),
        })?;

    Ok(DisplayQuantity {
        quantity: quantity / factor,
        unit: target_unit.trim().to_string(),
    })
}

/// Convert between two arbitrary units of the same dimension
pub fn convert_quantity(
    quantity: f64,
    from_unit: &str,
    to_unit: &str,
    item_name: &str,
) -> ConversionResult<DisplayQuantity> {
    let base = normalize_to_base_unit(quantity, from_unit, item_name)?;
    denormalize_from_base_unit(base.quantity, base.unit, to_unit, item_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_fallback_to_global_weight() {
        let result = normalize_to_base_unit(3.0, "kg", "mystery-item").unwrap();
        assert_eq!(result.unit, BaseUnit::Gram);
        assert!((result.quantity - 3000.0).abs() < EPS);
    }

    #[test]
    fn test_garlic_bulb() {
        let result = normalize_to_base_unit(2.0, "bulb", "garlic").unwrap();
        assert_eq!(result.unit, BaseUnit::Clove);
        assert!((result.quantity - 20.0).abs() < EPS);
    }

    #[test]
    fn test_plural_stripping() {
        let plural = normalize_to_base_unit(3.0, "cups", "rice").unwrap();
        let singular = normalize_to_base_unit(3.0, "cup", "rice").unwrap();
        assert_eq!(plural, singular);
        assert_eq!(plural.unit, BaseUnit::Milliliter);
        assert!((plural.quantity - 720.0).abs() < EPS);
    }

    #[test]
    fn test_unknown_unit() {
        let err = normalize_to_base_unit(1.0, "furlong", "rice").unwrap_err();
        assert_eq!(
            err,
            ConversionError::UnrecognizedUnit {
                unit: "furlong".to_string(),
                item_name: "rice".to_string(),
            }
        );
        let message = err.to_string();
        assert!(message.contains("furlong"));
        assert!(message.contains("rice"));
    }

    #[test]
    fn test_resolved_category_used_first() {
        // "piece" lives in quantity, the category resolved for "banana"
        let result = normalize_to_base_unit(4.0, "pieces", "banana").unwrap();
        assert_eq!(result.unit, BaseUnit::Piece);
        assert!((result.quantity - 4.0).abs() < EPS);
    }

    #[test]
    fn test_garlic_falls_back_to_weight() {
        let result = normalize_to_base_unit(0.5, "kg", "garlic").unwrap();
        assert_eq!(result.unit, BaseUnit::Gram);
        assert!((result.quantity - 500.0).abs() < EPS);
    }

    #[test]
    fn test_negative_and_zero_pass_through() {
        let zero = normalize_to_base_unit(0.0, "kg", "rice").unwrap();
        assert_eq!(zero.quantity, 0.0);
        let negative = normalize_to_base_unit(-2.0, "dozen", "egg").unwrap();
        assert!((negative.quantity + 24.0).abs() < EPS);
    }

    #[test]
    fn test_round_trip_identity() {
        let cases = [
            (3.0, "cup", "rice"),
            (1.25, "kg", "pork belly"),
            (2.0, "bulb", "garlic"),
            (7.0, "tbsp", "soy sauce"),
            (0.3, "lb", "mystery-item"),
            (2.0, "dozen", "egg"),
            (1.5, "liter", "milk"),
        ];
        for (quantity, unit, item) in cases {
            let base = normalize_to_base_unit(quantity, unit, item).unwrap();
            let back = denormalize_from_base_unit(base.quantity, base.unit, unit, item).unwrap();
            assert!(
                (back.quantity - quantity).abs() < 1e-9,
                "{} {} of {} came back as {}",
                quantity,
                unit,
                item,
                back.quantity
            );
            assert_eq!(back.unit, unit);
        }
    }

    #[test]
    fn test_denormalize_searches_matching_base() {
        // "rice" resolves to quantity, but grams are still expressible in kg
        let result = denormalize_from_base_unit(1500.0, BaseUnit::Gram, "kg", "rice").unwrap();
        assert!((result.quantity - 1.5).abs() < EPS);
        assert_eq!(result.unit, "kg");
    }

    #[test]
    fn test_denormalize_mismatched_dimension() {
        let err = denormalize_from_base_unit(200.0, BaseUnit::Gram, "pieces", "rice").unwrap_err();
        assert!(matches!(err, ConversionError::MismatchedUnitType { base_unit: BaseUnit::Gram, .. }));
    }

    #[test]
    fn test_denormalize_unknown_target_in_resolved_category() {
        // Resolved category matches the base unit but lacks the target
        let err = denormalize_from_base_unit(10.0, BaseUnit::Piece, "furlong", "banana").unwrap_err();
        assert!(matches!(err, ConversionError::UnrecognizedUnit { .. }));
    }

    #[test]
    fn test_denormalize_reaches_herbs() {
        let result = denormalize_from_base_unit(60.0, BaseUnit::Leaf, "bunch", "basil").unwrap();
        assert!((result.quantity - 2.0).abs() < EPS);
    }

    #[test]
    fn test_convert_quantity() {
        let result = convert_quantity(2.0, "lb", "kg", "chicken").unwrap();
        assert!((result.quantity - 0.907184).abs() < 1e-6);

        let result = convert_quantity(1.0, "cup", "tbsp", "rice").unwrap();
        assert!((result.quantity - 16.0).abs() < EPS);

        let err = convert_quantity(1.0, "cup", "kg", "rice").unwrap_err();
        assert!(matches!(err, ConversionError::MismatchedUnitType { .. }));
    }
}
