//! Ingredient line model
//!
//! An ingredient row as entered, and the priced line computed from it.

use serde::{Deserialize, Serialize};

use crate::conversion::{ConversionError, ConversionTable};

/// An ingredient row as supplied by the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngredientInput {
    pub name: String,
    pub quantity: f64,
    pub unit: String,
    pub unit_price: f64,
    /// Unit the price is quoted per. Defaults to `unit` when absent or blank.
    #[serde(default)]
    pub price_basis_unit: Option<String>,
}

impl IngredientInput {
    pub fn new(name: &str, quantity: f64, unit: &str, unit_price: f64, price_basis_unit: &str) -> Self {
        Self {
            name: name.to_string(),
            quantity,
            unit: unit.to_string(),
            unit_price,
            price_basis_unit: Some(price_basis_unit.to_string()),
        }
    }

    /// The unit the price applies to
    pub fn price_basis(&self) -> &str {
        self.price_basis_unit
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| self.unit.trim())
    }
}

/// Cost outcome for one line
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LineCost {
    /// Quantity converted into the price basis unit and priced
    Resolved { converted_quantity: f64, cost: f64 },
    /// The quantity could not be expressed in the price basis unit
    Unresolved { error: ConversionError },
}

/// A priced ingredient line
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IngredientLine {
    pub name: String,
    pub quantity: f64,
    pub unit: String,
    pub unit_price: f64,
    pub price_basis_unit: String,
    pub cost: LineCost,
}

impl IngredientLine {
    /// Price a validated input row
    pub(crate) fn compute(input: &IngredientInput, table: &ConversionTable) -> Self {
        let price_basis_unit = input.price_basis().to_string();
        let unit = input.unit.trim().to_string();

        let cost = match table.convert(input.quantity, &unit, &price_basis_unit) {
            Ok(converted_quantity) => {
                let cost = converted_quantity * input.unit_price;
                if cost.is_finite() {
                    LineCost::Resolved { converted_quantity, cost }
                } else {
                    LineCost::Unresolved {
                        error: ConversionError::Overflow {
                            unit: price_basis_unit.clone(),
                        },
                    }
                }
            }
            Err(error) => LineCost::Unresolved { error },
        };

        Self {
            name: input.name.trim().to_string(),
            quantity: input.quantity,
            unit,
            unit_price: input.unit_price,
            price_basis_unit,
            cost,
        }
    }

    pub fn converted_quantity(&self) -> Option<f64> {
        match self.cost {
            LineCost::Resolved { converted_quantity, .. } => Some(converted_quantity),
            LineCost::Unresolved { .. } => None,
        }
    }

    /// Unrounded line cost, if the line resolved
    pub fn line_cost(&self) -> Option<f64> {
        match self.cost {
            LineCost::Resolved { cost, .. } => Some(cost),
            LineCost::Unresolved { .. } => None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self.cost, LineCost::Resolved { .. })
    }

    pub fn conversion_error(&self) -> Option<&ConversionError> {
        match &self.cost {
            LineCost::Resolved { .. } => None,
            LineCost::Unresolved { error } => Some(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> ConversionTable {
        ConversionTable::standard().unwrap()
    }

    #[test]
    fn test_price_basis_defaults_to_unit() {
        let mut input = IngredientInput::new("Flour", 2.0, "kg", 40.0, "kg");
        input.price_basis_unit = None;
        assert_eq!(input.price_basis(), "kg");

        input.price_basis_unit = Some("   ".to_string());
        assert_eq!(input.price_basis(), "kg");

        input.price_basis_unit = Some("gram".to_string());
        assert_eq!(input.price_basis(), "gram");
    }

    #[test]
    fn test_resolved_line() {
        let line = IngredientLine::compute(&IngredientInput::new("Milk", 500.0, "ml", 60.0, "L"), &table());
        assert!(line.is_resolved());
        assert!((line.converted_quantity().unwrap() - 0.5).abs() < 1e-12);
        assert!((line.line_cost().unwrap() - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_unresolved_line_has_no_cost() {
        let line = IngredientLine::compute(&IngredientInput::new("Rice", 2.0, "cup", 90.0, "L"), &table());
        assert!(!line.is_resolved());
        assert_eq!(line.line_cost(), None);
        assert_eq!(line.converted_quantity(), None);
        assert!(line.conversion_error().is_some());
    }

    #[test]
    fn test_overflowing_line_is_unresolved() {
        // Converting kg to g overflows before the price is applied
        let line = IngredientLine::compute(&IngredientInput::new("Salt", 1e306, "kg", 1e6, "g"), &table());
        assert!(!line.is_resolved());
        assert!(matches!(line.conversion_error(), Some(ConversionError::Overflow { unit }) if unit == "g"));

        // The conversion fits but the cost does not
        let line = IngredientLine::compute(&IngredientInput::new("Saffron", 1e300, "g", 1e300, "g"), &table());
        assert_eq!(line.line_cost(), None);
        assert!(matches!(line.conversion_error(), Some(ConversionError::Overflow { .. })));
    }

    #[test]
    fn test_names_are_trimmed() {
        let line = IngredientLine::compute(&IngredientInput::new("  Sugar ", 1.0, " kg ", 50.0, "kg"), &table());
        assert_eq!(line.name, "Sugar");
        assert_eq!(line.unit, "kg");
    }
}
