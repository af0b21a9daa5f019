//! Unit conversion functions
//!
//! Converts quantities between unit names using a [`ConversionTable`]. Unit
//! names arrive as free text from callers, so this is where they get parsed.

use serde::Serialize;
use thiserror::Error;

use super::table::ConversionTable;
use super::units::Unit;

/// Why a quantity could not be converted
#[derive(Debug, Clone, Error, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConversionError {
    #[error("Unknown unit '{unit}'")]
    UnknownUnit { unit: String },

    #[error("No conversion factor from {from} to {to}")]
    MissingFactor { from: Unit, to: Unit },

    #[error("Amount in '{unit}' is too large to compute")]
    Overflow { unit: String },
}

/// Normalize a unit name for identity comparison
fn normalize(unit: &str) -> String {
    unit.trim().to_lowercase()
}

/// Parse a unit name or report it as unknown
pub fn parse_unit(unit: &str) -> Result<Unit, ConversionError> {
    Unit::parse(unit).ok_or_else(|| ConversionError::UnknownUnit {
        unit: unit.trim().to_string(),
    })
}

/// Whether two unit names denote the same unit
///
/// Names outside the table (e.g. "each") are only equal to themselves.
pub fn same_unit(a: &str, b: &str) -> bool {
    if normalize(a) == normalize(b) {
        return true;
    }
    matches!((Unit::parse(a), Unit::parse(b)), (Some(x), Some(y)) if x == y)
}

/// Convert a quantity from one unit to another
///
/// Identical units return the quantity untouched. Anything else needs a
/// declared factor for the ordered pair.
pub fn convert(
    table: &ConversionTable,
    quantity: f64,
    from_unit: &str,
    to_unit: &str,
) -> Result<f64, ConversionError> {
    if same_unit(from_unit, to_unit) {
        return Ok(quantity);
    }

    let from = parse_unit(from_unit)?;
    let to = parse_unit(to_unit)?;

    let factor = table
        .factor(from, to)
        .ok_or(ConversionError::MissingFactor { from, to })?;

    let converted = quantity * factor;
    if !converted.is_finite() {
        return Err(ConversionError::Overflow {
            unit: to_unit.trim().to_string(),
        });
    }
    Ok(converted)
}

impl ConversionTable {
    /// Convert a quantity using this table
    pub fn convert(&self, quantity: f64, from_unit: &str, to_unit: &str) -> Result<f64, ConversionError> {
        convert(self, quantity, from_unit, to_unit)
    }
}
