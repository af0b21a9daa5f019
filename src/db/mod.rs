//! Database module
//!
//! SQLite storage for the saved ingredient catalog. Recipe books never touch it.

pub mod connection;
pub mod migrations;

pub use connection::{Database, DbError, DbResult};
