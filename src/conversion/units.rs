//! Unit types and conversion constants
//!
//! Provides the closed set of measurement units the costing engine understands
//! and the standard factors between them.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Whether a unit measures mass or volume
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitCategory {
    /// Weight/mass units (g, kg, oz, lb)
    Weight,
    /// Volume units (ml, L, tsp, tbsp, cup)
    Volume,
}

/// A supported measurement unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    Gram,
    Kilogram,
    Ounce,
    Pound,
    Millilitre,
    Litre,
    Teaspoon,
    Tablespoon,
    Cup,
}

impl Unit {
    /// Every supported unit, in display order
    pub const ALL: [Unit; 9] = [
        Unit::Gram,
        Unit::Kilogram,
        Unit::Ounce,
        Unit::Pound,
        Unit::Millilitre,
        Unit::Litre,
        Unit::Teaspoon,
        Unit::Tablespoon,
        Unit::Cup,
    ];

    /// Parse a unit name, accepting common abbreviations and spellings
    pub fn parse(s: &str) -> Option<Self> {
        let lower = s.to_lowercase();
        let trimmed = lower.trim();

        match trimmed {
            "g" | "gram" | "grams" | "gm" => Some(Unit::Gram),
            "kg" | "kilogram" | "kilograms" | "kgs" => Some(Unit::Kilogram),
            "oz" | "ounce" | "ounces" => Some(Unit::Ounce),
            "lb" | "lbs" | "pound" | "pounds" => Some(Unit::Pound),
            "ml" | "milliliter" | "milliliters" | "millilitre" | "millilitres" => {
                Some(Unit::Millilitre)
            }
            "l" | "liter" | "liters" | "litre" | "litres" => Some(Unit::Litre),
            "tsp" | "teaspoon" | "teaspoons" => Some(Unit::Teaspoon),
            "tbsp" | "tablespoon" | "tablespoons" => Some(Unit::Tablespoon),
            "cup" | "cups" => Some(Unit::Cup),
            _ => None,
        }
    }

    /// Canonical short symbol
    pub fn symbol(&self) -> &'static str {
        match self {
            Unit::Gram => "g",
            Unit::Kilogram => "kg",
            Unit::Ounce => "oz",
            Unit::Pound => "lb",
            Unit::Millilitre => "ml",
            Unit::Litre => "L",
            Unit::Teaspoon => "tsp",
            Unit::Tablespoon => "tbsp",
            Unit::Cup => "cup",
        }
    }

    /// Accepted spellings, used by the unit listing tool
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            Unit::Gram => &["g", "gram", "grams", "gm"],
            Unit::Kilogram => &["kg", "kilogram", "kilograms", "kgs"],
            Unit::Ounce => &["oz", "ounce", "ounces"],
            Unit::Pound => &["lb", "lbs", "pound", "pounds"],
            Unit::Millilitre => &["ml", "milliliter", "milliliters", "millilitre", "millilitres"],
            Unit::Litre => &["l", "liter", "liters", "litre", "litres"],
            Unit::Teaspoon => &["tsp", "teaspoon", "teaspoons"],
            Unit::Tablespoon => &["tbsp", "tablespoon", "tablespoons"],
            Unit::Cup => &["cup", "cups"],
        }
    }

    pub fn category(&self) -> UnitCategory {
        match self {
            Unit::Gram | Unit::Kilogram | Unit::Ounce | Unit::Pound => UnitCategory::Weight,
            Unit::Millilitre | Unit::Litre | Unit::Teaspoon | Unit::Tablespoon | Unit::Cup => {
                UnitCategory::Volume
            }
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

// ============================================================================
// Weight Conversion Constants (to grams)
// ============================================================================

/// Grams per kilogram
pub const G_PER_KG: f64 = 1000.0;
/// Grams per ounce
pub const G_PER_OZ: f64 = 28.35;
/// Grams per pound
pub const G_PER_LB: f64 = 453.592;

// ============================================================================
// Volume Conversion Constants (to milliliters)
// ============================================================================

/// Milliliters per liter
pub const ML_PER_LITRE: f64 = 1000.0;
/// Milliliters per teaspoon
pub const ML_PER_TSP: f64 = 4.92892;
/// Milliliters per tablespoon
pub const ML_PER_TBSP: f64 = 14.7868;
/// Milliliters per cup (US)
pub const ML_PER_CUP: f64 = 236.588;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_weight_units() {
        assert_eq!(Unit::parse("g"), Some(Unit::Gram));
        assert_eq!(Unit::parse("gram"), Some(Unit::Gram));
        assert_eq!(Unit::parse("KG"), Some(Unit::Kilogram));
        assert_eq!(Unit::parse(" ounce "), Some(Unit::Ounce));
        assert_eq!(Unit::parse("lbs"), Some(Unit::Pound));
    }

    #[test]
    fn test_parse_volume_units() {
        assert_eq!(Unit::parse("ml"), Some(Unit::Millilitre));
        assert_eq!(Unit::parse("L"), Some(Unit::Litre));
        assert_eq!(Unit::parse("litre"), Some(Unit::Litre));
        assert_eq!(Unit::parse("Tablespoons"), Some(Unit::Tablespoon));
        assert_eq!(Unit::parse("cups"), Some(Unit::Cup));
    }

    #[test]
    fn test_parse_unknown_units() {
        assert_eq!(Unit::parse("pinch"), None);
        assert_eq!(Unit::parse("each"), None);
        assert_eq!(Unit::parse(""), None);
    }

    #[test]
    fn test_aliases_round_trip() {
        for unit in Unit::ALL {
            for alias in unit.aliases() {
                assert_eq!(Unit::parse(alias), Some(unit), "alias {alias}");
            }
            assert_eq!(Unit::parse(unit.symbol()), Some(unit));
        }
    }

    #[test]
    fn test_categories() {
        assert_eq!(Unit::Pound.category(), UnitCategory::Weight);
        assert_eq!(Unit::Cup.category(), UnitCategory::Volume);
    }
}
