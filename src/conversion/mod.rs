//! Unit conversion module
//!
//! Closed unit set, validated factor table, and the conversion function.

pub mod converter;
pub mod table;
pub mod units;

pub use converter::{convert, parse_unit, same_unit, ConversionError};
pub use table::{ConversionTable, DeclaredFactor, TableError, STANDARD_FACTORS};
pub use units::{Unit, UnitCategory};
