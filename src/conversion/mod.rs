//! Unit conversion module
//!
//! Resolves conversion categories for item names and converts quantities
//! between arbitrary units and canonical base units.

pub mod converter;
pub mod error;
pub mod parser;
pub mod resolver;
pub mod units;

pub use converter::{
    convert_quantity, denormalize_from_base_unit, normalize_to_base_unit, ConvertedQuantity,
    DisplayQuantity,
};
pub use error::{ConversionError, ConversionResult};
pub use parser::{parse_quantity_expression, QuantityExpression, DEFAULT_UNIT};
pub use resolver::resolve_category;
pub use units::{normalize_unit_token, BaseUnit, ConversionCategory, CATEGORIES};
