//! Conversion factor table
//!
//! The table is data: a list of directional unit pairs with the multiplier that
//! turns one source unit into target units. Nothing is inferred. A pair that is
//! not listed does not convert, and every listed pair must also list its reverse.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use thiserror::Error;

use super::units::{Unit, G_PER_KG, G_PER_LB, G_PER_OZ, ML_PER_CUP, ML_PER_LITRE, ML_PER_TBSP, ML_PER_TSP};

/// Relative tolerance for a forward factor times its reverse
const RECIPROCAL_TOLERANCE: f64 = 1e-9;

/// Directional factors shipped with the calculator
pub const STANDARD_FACTORS: &[(Unit, Unit, f64)] = &[
    (Unit::Gram, Unit::Kilogram, 1.0 / G_PER_KG),
    (Unit::Kilogram, Unit::Gram, G_PER_KG),
    (Unit::Millilitre, Unit::Litre, 1.0 / ML_PER_LITRE),
    (Unit::Litre, Unit::Millilitre, ML_PER_LITRE),
    (Unit::Ounce, Unit::Gram, G_PER_OZ),
    (Unit::Gram, Unit::Ounce, 1.0 / G_PER_OZ),
    (Unit::Pound, Unit::Gram, G_PER_LB),
    (Unit::Gram, Unit::Pound, 1.0 / G_PER_LB),
    (Unit::Pound, Unit::Kilogram, G_PER_LB / G_PER_KG),
    (Unit::Kilogram, Unit::Pound, G_PER_KG / G_PER_LB),
    (Unit::Teaspoon, Unit::Millilitre, ML_PER_TSP),
    (Unit::Millilitre, Unit::Teaspoon, 1.0 / ML_PER_TSP),
    (Unit::Tablespoon, Unit::Millilitre, ML_PER_TBSP),
    (Unit::Millilitre, Unit::Tablespoon, 1.0 / ML_PER_TBSP),
    (Unit::Tablespoon, Unit::Teaspoon, ML_PER_TBSP / ML_PER_TSP),
    (Unit::Teaspoon, Unit::Tablespoon, ML_PER_TSP / ML_PER_TBSP),
    (Unit::Cup, Unit::Millilitre, ML_PER_CUP),
    (Unit::Millilitre, Unit::Cup, 1.0 / ML_PER_CUP),
];

/// Problems found while validating a conversion table
#[derive(Debug, Error, PartialEq)]
pub enum TableError {
    #[error("Factor for {from} -> {to} must be positive and finite, got {factor}")]
    InvalidFactor { from: Unit, to: Unit, factor: f64 },

    #[error("Pair {0} -> {0} is implicit and must not be listed")]
    SelfPair(Unit),

    #[error("Pair {from} -> {to} is listed more than once")]
    DuplicatePair { from: Unit, to: Unit },

    #[error("Pair {from} -> {to} has no reverse entry")]
    MissingReverse { from: Unit, to: Unit },

    #[error("Pair {from} -> {to} ({forward}) is not the reciprocal of its reverse ({reverse})")]
    InconsistentReverse {
        from: Unit,
        to: Unit,
        forward: f64,
        reverse: f64,
    },

    #[error("Unit {0} does not appear in any conversion pair")]
    UncoveredUnit(Unit),
}

/// A declared conversion, as reported by the unit listing tool
#[derive(Debug, Clone, Copy, Serialize)]
pub struct DeclaredFactor {
    pub from: Unit,
    pub to: Unit,
    pub factor: f64,
}

/// Validated, closed table of directional conversion factors
#[derive(Debug, Clone)]
pub struct ConversionTable {
    factors: BTreeMap<(Unit, Unit), f64>,
}

impl ConversionTable {
    /// Build a table from directional entries, rejecting anything inconsistent
    pub fn new(entries: &[(Unit, Unit, f64)]) -> Result<Self, TableError> {
        let mut factors = BTreeMap::new();

        for &(from, to, factor) in entries {
            if from == to {
                return Err(TableError::SelfPair(from));
            }
            if !factor.is_finite() || factor <= 0.0 {
                return Err(TableError::InvalidFactor { from, to, factor });
            }
            if factors.insert((from, to), factor).is_some() {
                return Err(TableError::DuplicatePair { from, to });
            }
        }

        for (&(from, to), &forward) in &factors {
            let reverse = factors
                .get(&(to, from))
                .copied()
                .ok_or(TableError::MissingReverse { from, to })?;

            if ((forward * reverse) - 1.0).abs() > RECIPROCAL_TOLERANCE {
                return Err(TableError::InconsistentReverse {
                    from,
                    to,
                    forward,
                    reverse,
                });
            }
        }

        let covered: BTreeSet<Unit> = factors.keys().map(|&(from, _)| from).collect();
        if let Some(unit) = Unit::ALL.iter().find(|u| !covered.contains(u)) {
            return Err(TableError::UncoveredUnit(*unit));
        }

        Ok(Self { factors })
    }

    /// The table shipped with the calculator
    pub fn standard() -> Result<Self, TableError> {
        Self::new(STANDARD_FACTORS)
    }

    /// Factor for an ordered pair, if declared
    pub fn factor(&self, from: Unit, to: Unit) -> Option<f64> {
        self.factors.get(&(from, to)).copied()
    }

    /// Units reachable from `from` in one step
    pub fn targets(&self, from: Unit) -> Vec<Unit> {
        self.factors
            .keys()
            .filter(|(f, _)| *f == from)
            .map(|&(_, to)| to)
            .collect()
    }

    /// All declared pairs in a stable order
    pub fn declared(&self) -> Vec<DeclaredFactor> {
        self.factors
            .iter()
            .map(|(&(from, to), &factor)| DeclaredFactor { from, to, factor })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.factors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_table_is_valid() {
        let table = ConversionTable::standard().unwrap();
        assert_eq!(table.len(), STANDARD_FACTORS.len());
        assert_eq!(table.factor(Unit::Gram, Unit::Kilogram), Some(0.001));
        assert_eq!(table.factor(Unit::Kilogram, Unit::Gram), Some(1000.0));
        assert_eq!(table.factor(Unit::Ounce, Unit::Gram), Some(28.35));
    }

    #[test]
    fn test_no_implicit_pairs() {
        let table = ConversionTable::standard().unwrap();
        assert_eq!(table.factor(Unit::Cup, Unit::Litre), None);
        assert_eq!(table.factor(Unit::Gram, Unit::Litre), None);
    }

    #[test]
    fn test_missing_reverse_rejected() {
        let mut entries: Vec<_> = STANDARD_FACTORS.to_vec();
        entries.retain(|&(from, to, _)| !(from == Unit::Gram && to == Unit::Pound));

        let err = ConversionTable::new(&entries).unwrap_err();
        assert_eq!(
            err,
            TableError::MissingReverse {
                from: Unit::Pound,
                to: Unit::Gram
            }
        );
    }

    #[test]
    fn test_invalid_factor_rejected() {
        let err = ConversionTable::new(&[(Unit::Gram, Unit::Kilogram, 0.0)]).unwrap_err();
        assert!(matches!(err, TableError::InvalidFactor { .. }));

        let err = ConversionTable::new(&[(Unit::Gram, Unit::Kilogram, f64::NAN)]).unwrap_err();
        assert!(matches!(err, TableError::InvalidFactor { .. }));
    }

    #[test]
    fn test_inconsistent_reverse_rejected() {
        let err = ConversionTable::new(&[
            (Unit::Gram, Unit::Kilogram, 0.001),
            (Unit::Kilogram, Unit::Gram, 100.0),
        ])
        .unwrap_err();
        assert!(matches!(err, TableError::InconsistentReverse { .. }));
    }

    #[test]
    fn test_self_and_duplicate_pairs_rejected() {
        let err = ConversionTable::new(&[(Unit::Cup, Unit::Cup, 1.0)]).unwrap_err();
        assert_eq!(err, TableError::SelfPair(Unit::Cup));

        let err = ConversionTable::new(&[
            (Unit::Gram, Unit::Kilogram, 0.001),
            (Unit::Gram, Unit::Kilogram, 0.001),
        ])
        .unwrap_err();
        assert!(matches!(err, TableError::DuplicatePair { .. }));
    }

    #[test]
    fn test_uncovered_unit_rejected() {
        let err = ConversionTable::new(&[
            (Unit::Gram, Unit::Kilogram, 0.001),
            (Unit::Kilogram, Unit::Gram, 1000.0),
        ])
        .unwrap_err();
        assert_eq!(err, TableError::UncoveredUnit(Unit::Ounce));
    }

    #[test]
    fn test_targets() {
        let table = ConversionTable::standard().unwrap();
        let targets = table.targets(Unit::Cup);
        assert_eq!(targets, vec![Unit::Millilitre]);
    }
}
