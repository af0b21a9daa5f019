//! Export module
//!
//! Lays recipes and recipe books out as sheets and writes them as xlsx.

pub mod document;
pub mod sheet_names;
pub mod xlsx;

use thiserror::Error;

pub use document::{export_book, export_recipe, Cell, ExportOptions, Sheet, TabularDocument, SUMMARY_SHEET_NAME};
pub use sheet_names::{sanitize, SheetNamer, MAX_SHEET_NAME_CHARS};
pub use xlsx::{save_xlsx, write_xlsx};

/// Export failures; the book being exported is never modified
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Recipe book is empty")]
    EmptyBook,

    #[error("No recipe at position {index} (book holds {len})")]
    RecipeNotFound { index: usize, len: usize },

    #[error("Could not find a free sheet name for '{dish_name}'")]
    SheetNames { dish_name: String },

    #[error("Sheet '{sheet}' has more rows or columns than a worksheet allows")]
    TooLarge { sheet: String },

    #[error("Spreadsheet error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("Could not write export file: {0}")]
    Io(#[from] std::io::Error),
}
