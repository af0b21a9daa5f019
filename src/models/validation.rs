//! Input validation errors
//!
//! Pricing checks every field before computing anything and reports all
//! problems at once, so a caller can fix every row in one pass.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// The input field a violation refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    DishName,
    Servings,
    Name,
    Quantity,
    Unit,
    UnitPrice,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::DishName => "dish_name",
            Field::Servings => "servings",
            Field::Name => "name",
            Field::Quantity => "quantity",
            Field::Unit => "unit",
            Field::UnitPrice => "unit_price",
        }
    }
}

/// One failed constraint
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldViolation {
    /// Zero-based ingredient row, or None for the dish header
    pub row: Option<usize>,
    pub field: Field,
    pub message: String,
}

impl FieldViolation {
    pub fn dish(field: Field, message: impl Into<String>) -> Self {
        Self {
            row: None,
            field,
            message: message.into(),
        }
    }

    pub fn row(row: usize, field: Field, message: impl Into<String>) -> Self {
        Self {
            row: Some(row),
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.row {
            Some(row) => write!(f, "ingredient {} {}: {}", row + 1, self.field.as_str(), self.message),
            None => write!(f, "dish {}: {}", self.field.as_str(), self.message),
        }
    }
}

fn summarize(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// A dish or its ingredient rows failed validation
#[derive(Debug, Clone, Error, PartialEq, Serialize)]
#[error("{} invalid field(s): {}", .violations.len(), summarize(.violations))]
pub struct ValidationError {
    pub violations: Vec<FieldViolation>,
}

impl ValidationError {
    /// Violations for one ingredient row
    pub fn for_row(&self, row: usize) -> Vec<&FieldViolation> {
        self.violations.iter().filter(|v| v.row == Some(row)).collect()
    }
}
