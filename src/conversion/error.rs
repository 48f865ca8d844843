//! Conversion error types

use thiserror::Error;

use super::units::BaseUnit;

/// Errors raised while converting quantities
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConversionError {
    #[error("Unrecognized unit '{unit}' for item '{item_name}'")]
    UnrecognizedUnit { unit: String, item_name: String },

    #[error("Cannot express {base_unit} as '{target_unit}' for item '{item_name}': mismatched unit types")]
    MismatchedUnitType {
        base_unit: BaseUnit,
        target_unit: String,
        item_name: String,
    },

    #[error("Could not read a quantity from '{input}'")]
    InvalidQuantity { input: String },
}

/// Result type for conversion operations
pub type ConversionResult<T> = Result<T, ConversionError>;
