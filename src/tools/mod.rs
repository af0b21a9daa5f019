//! Recipe Cost Tools module
//!
//! MCP tool implementations for the recipe cost calculator.

pub mod export;
pub mod recipes;
pub mod saved_ingredients;
pub mod status;
pub mod units;
