//! Recipe Cost Calculator Library
//!
//! Ingredient costing with unit conversion, per-session recipe books, and
//! xlsx export.

pub mod build_info;
pub mod config;
pub mod conversion;
pub mod db;
pub mod export;
pub mod mcp;
pub mod models;
pub mod session;
pub mod tools;
