//! Conversion category resolution
//!
//! Picks the single most specific category for a free-text item name.

use super::units::{ConversionCategory, GARLIC, QUANTITY, VOLUME, WEIGHT};

/// Ingredient keywords that own a dedicated category
static INGREDIENT_OVERRIDES: [(&str, &ConversionCategory); 1] = [("garlic", &GARLIC)];

/// Categories whose unit tokens are tested against the item name, in priority order
static UNIT_TOKEN_PRIORITY: [&ConversionCategory; 2] = [&WEIGHT, &VOLUME];

/// Resolve the conversion category for an item name.
///
/// Ingredient overrides win. Otherwise the item name is searched for any unit
/// token of `weight`, then `volume`. Note this tests the *name* against *unit
/// tokens*, so "Eggplant" contains "g" and lands in `weight`. Falls back to
/// `quantity`; never fails.
pub fn resolve_category(item_name: &str) -> &'static ConversionCategory {
    let name = item_name.to_lowercase();

    if let Some((_, category)) = INGREDIENT_OVERRIDES
        .iter()
        .find(|(keyword, _)| name.contains(keyword))
    {
        return *category;
    }

    UNIT_TOKEN_PRIORITY
        .iter()
        .copied()
        .find(|category| category.units().any(|unit| name.contains(unit)))
        .unwrap_or(&QUANTITY)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_garlic_override() {
        assert_eq!(resolve_category("garlic").name, "garlic");
        assert_eq!(resolve_category("Roasted GARLIC bulbs").name, "garlic");
    }

    #[test]
    fn test_default_is_quantity() {
        assert_eq!(resolve_category("mystery-item").name, "quantity");
        assert_eq!(resolve_category("rice").name, "quantity");
        assert_eq!(resolve_category("Red Tomato").name, "quantity");
    }

    #[test]
    fn test_name_containing_weight_token() {
        // "kg" appears literally in the name
        assert_eq!(resolve_category("5kg sack").name, "weight");
        // Single-letter tokens match incidental letters too
        assert_eq!(resolve_category("eggplant").name, "weight");
    }

    #[test]
    fn test_weight_checked_before_volume() {
        // Contains both "g" and "l"
        assert_eq!(resolve_category("ginger ale").name, "weight");
        // Only "l"
        assert_eq!(resolve_category("milk").name, "volume");
    }

    #[test]
    fn test_empty_name() {
        assert_eq!(resolve_category("").name, "quantity");
    }
}
