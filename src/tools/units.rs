//! Unit MCP Tools
//!
//! Tools for listing supported units and converting quantities.

use serde::Serialize;

use crate::conversion::{ConversionError, ConversionTable, DeclaredFactor, Unit, UnitCategory};

/// A supported unit with its spellings
#[derive(Debug, Serialize)]
pub struct UnitInfo {
    pub unit: Unit,
    pub symbol: &'static str,
    pub category: UnitCategory,
    pub aliases: &'static [&'static str],
    pub converts_to: Vec<&'static str>,
}

/// Response for list_units
#[derive(Debug, Serialize)]
pub struct ListUnitsResponse {
    pub units: Vec<UnitInfo>,
    pub factors: Vec<DeclaredFactor>,
}

/// Response for convert_unit
#[derive(Debug, Serialize)]
pub struct ConvertUnitResponse {
    pub quantity: f64,
    pub from_unit: String,
    pub to_unit: String,
    pub converted: Option<f64>,
    pub error: Option<ConversionError>,
}

/// List units and declared factors
pub fn list_units(table: &ConversionTable) -> ListUnitsResponse {
    let units = Unit::ALL
        .iter()
        .map(|&unit| UnitInfo {
            unit,
            symbol: unit.symbol(),
            category: unit.category(),
            aliases: unit.aliases(),
            converts_to: table.targets(unit).iter().map(Unit::symbol).collect(),
        })
        .collect();

    ListUnitsResponse {
        units,
        factors: table.declared(),
    }
}

/// Convert a single quantity
pub fn convert_unit(
    table: &ConversionTable,
    quantity: f64,
    from_unit: &str,
    to_unit: &str,
) -> Result<ConvertUnitResponse, String> {
    if !quantity.is_finite() || quantity < 0.0 {
        return Err("quantity must be a finite, non-negative number".to_string());
    }

    let (converted, error) = match table.convert(quantity, from_unit, to_unit) {
        Ok(value) => (Some(value), None),
        Err(e) => (None, Some(e)),
    };

    Ok(ConvertUnitResponse {
        quantity,
        from_unit: from_unit.trim().to_string(),
        to_unit: to_unit.trim().to_string(),
        converted,
        error,
    })
}
