//! Recipe model
//!
//! A priced dish. Totals are always derived from the lines on demand.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::conversion::{ConversionError, ConversionTable};
use super::ingredient::{IngredientInput, IngredientLine, LineCost};
use super::validation::{Field, FieldViolation, ValidationError};

/// Round a money amount to two decimals for display
///
/// Only presentation code calls this. Totals accumulate unrounded.
pub fn round_currency(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Dish header as supplied by the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DishHeader {
    pub name: String,
    /// Signed so that zero and negative counts reach validation
    pub servings: i64,
}

impl DishHeader {
    pub fn new(name: &str, servings: i64) -> Self {
        Self {
            name: name.to_string(),
            servings,
        }
    }
}

/// A priced recipe
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recipe {
    pub dish_name: String,
    pub servings: u32,
    lines: Vec<IngredientLine>,
    pub created_at: DateTime<Utc>,
}

impl Recipe {
    pub fn lines(&self) -> &[IngredientLine] {
        &self.lines
    }

    /// Sum of resolved line costs, unrounded
    pub fn total_cost(&self) -> f64 {
        self.lines.iter().filter_map(IngredientLine::line_cost).sum()
    }

    pub fn cost_per_serving(&self) -> f64 {
        self.total_cost() / f64::from(self.servings)
    }

    /// False when any line could not be converted; the total is then understated
    pub fn is_complete(&self) -> bool {
        self.lines.iter().all(IngredientLine::is_resolved)
    }

    /// Lines that did not resolve, with their row index
    pub fn unresolved_lines(&self) -> impl Iterator<Item = (usize, &IngredientLine)> {
        self.lines.iter().enumerate().filter(|(_, line)| !line.is_resolved())
    }

    /// Total rounded once for display
    pub fn display_total(&self) -> f64 {
        round_currency(self.total_cost())
    }

    pub fn display_cost_per_serving(&self) -> f64 {
        round_currency(self.cost_per_serving())
    }
}

fn check_amount(violations: &mut Vec<FieldViolation>, row: usize, field: Field, value: f64) {
    if !value.is_finite() {
        violations.push(FieldViolation::row(row, field, "must be a finite number"));
    } else if value < 0.0 {
        violations.push(FieldViolation::row(row, field, "must not be negative"));
    }
}

/// Check the dish header and every row, collecting all violations
///
/// Returns the validated serving count.
pub fn validate(dish: &DishHeader, rows: &[IngredientInput]) -> Result<u32, ValidationError> {
    let mut violations = Vec::new();

    if dish.name.trim().is_empty() {
        violations.push(FieldViolation::dish(Field::DishName, "must not be empty"));
    }

    let servings = match u32::try_from(dish.servings) {
        Ok(n) if n >= 1 => Some(n),
        Ok(_) => {
            violations.push(FieldViolation::dish(Field::Servings, "must be at least 1"));
            None
        }
        Err(_) if dish.servings < 0 => {
            violations.push(FieldViolation::dish(Field::Servings, "must be at least 1"));
            None
        }
        Err(_) => {
            violations.push(FieldViolation::dish(Field::Servings, "is too large"));
            None
        }
    };

    for (row, input) in rows.iter().enumerate() {
        if input.name.trim().is_empty() {
            violations.push(FieldViolation::row(row, Field::Name, "must not be empty"));
        }
        if input.unit.trim().is_empty() {
            violations.push(FieldViolation::row(row, Field::Unit, "must not be empty"));
        }
        check_amount(&mut violations, row, Field::Quantity, input.quantity);
        check_amount(&mut violations, row, Field::UnitPrice, input.unit_price);
    }

    match servings {
        Some(n) if violations.is_empty() => Ok(n),
        _ => Err(ValidationError { violations }),
    }
}

/// Price a dish from its ingredient rows
///
/// Rows whose units cannot be converted are kept as unresolved lines and make
/// the recipe incomplete. Nothing is priced if any field is invalid.
pub fn price(
    dish: &DishHeader,
    rows: &[IngredientInput],
    table: &ConversionTable,
) -> Result<Recipe, ValidationError> {
    let servings = validate(dish, rows)?;

    // A line that would push the total past f64 range is left unresolved
    let mut running_total = 0.0;
    let lines: Vec<IngredientLine> = rows
        .iter()
        .map(|input| {
            let mut line = IngredientLine::compute(input, table);
            if let Some(cost) = line.line_cost() {
                if (running_total + cost).is_finite() {
                    running_total += cost;
                } else {
                    line.cost = LineCost::Unresolved {
                        error: ConversionError::Overflow {
                            unit: line.price_basis_unit.clone(),
                        },
                    };
                }
            }
            line
        })
        .collect();

    let recipe = Recipe {
        dish_name: dish.name.trim().to_string(),
        servings,
        lines,
        created_at: Utc::now(),
    };

    for (row, line) in recipe.unresolved_lines() {
        if let Some(error) = line.conversion_error() {
            tracing::warn!(
                "Recipe '{}' ingredient {} ('{}') unresolved: {}",
                recipe.dish_name,
                row + 1,
                line.name,
                error
            );
        }
    }

    tracing::debug!(
        dish = %recipe.dish_name,
        lines = recipe.lines.len(),
        total = recipe.total_cost(),
        complete = recipe.is_complete(),
        "Priced recipe"
    );

    Ok(recipe)
}
