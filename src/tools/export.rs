//! Export MCP Tools
//!
//! Writes a session's recipes to xlsx files in the export directory.

use std::path::Path;

use base64::Engine;
use serde::Serialize;

use crate::export::{self, ExportError, ExportOptions, TabularDocument};
use crate::session::SessionBooks;

/// File name used for single-recipe exports when none is given
pub const DEFAULT_RECIPE_FILE: &str = "recipe_cost.xlsx";
/// File name used for book exports when none is given
pub const DEFAULT_BOOK_FILE: &str = "recipe_book.xlsx";

/// Response for export_recipe and export_book
#[derive(Debug, Serialize)]
pub struct ExportResponse {
    pub session_id: String,
    pub file_path: String,
    pub bytes: usize,
    pub sheets: Vec<String>,
    pub recipes: usize,
    /// Workbook contents, only when inline output was requested
    pub content_base64: Option<String>,
}

/// Reduce a requested file name to a bare `.xlsx` name inside the export directory
pub fn export_file_name(requested: Option<&str>, default: &str) -> String {
    let Some(requested) = requested else {
        return default.to_string();
    };

    // Keep only the last path component
    let base = requested
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();
    if base.trim_matches('.').is_empty() {
        return default.to_string();
    }

    let stem: String = base
        .strip_suffix(".xlsx")
        .unwrap_or(base)
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' || c == ' ' { c } else { '_' })
        .collect();
    let stem = stem.trim();

    if stem.is_empty() {
        default.to_string()
    } else {
        format!("{}.xlsx", stem)
    }
}

fn write(
    document: &TabularDocument,
    session_id: &str,
    export_dir: &Path,
    file_name: String,
    recipes: usize,
    inline: bool,
) -> Result<ExportResponse, ExportError> {
    let bytes = export::write_xlsx(document)?;
    std::fs::create_dir_all(export_dir)?;
    let path = export_dir.join(file_name);
    std::fs::write(&path, &bytes)?;

    tracing::info!(
        session = session_id,
        path = %path.display(),
        sheets = document.sheets.len(),
        "Exported workbook"
    );

    Ok(ExportResponse {
        session_id: session_id.to_string(),
        file_path: path.display().to_string(),
        bytes: bytes.len(),
        sheets: document.sheet_names().into_iter().map(String::from).collect(),
        recipes,
        content_base64: inline.then(|| base64::engine::general_purpose::STANDARD.encode(&bytes)),
    })
}

/// Export one recipe from the session book; defaults to the most recent
pub fn export_recipe(
    books: &SessionBooks,
    export_dir: &Path,
    session_id: &str,
    index: Option<usize>,
    file_name: Option<&str>,
    inline: bool,
) -> Result<ExportResponse, String> {
    let book = books.snapshot(session_id);
    if book.is_empty() {
        return Err(ExportError::EmptyBook.to_string());
    }

    let index = index.unwrap_or(book.len() - 1);
    let recipe = book.get(index).ok_or_else(|| {
        ExportError::RecipeNotFound {
            index,
            len: book.len(),
        }
        .to_string()
    })?;

    let document = export::export_recipe(recipe).map_err(|e| e.to_string())?;
    write(
        &document,
        session_id,
        export_dir,
        export_file_name(file_name, DEFAULT_RECIPE_FILE),
        1,
        inline,
    )
    .map_err(|e| format!("Export failed: {}", e))
}

/// Export the whole session book
pub fn export_book(
    books: &SessionBooks,
    export_dir: &Path,
    session_id: &str,
    include_summary: bool,
    file_name: Option<&str>,
    inline: bool,
) -> Result<ExportResponse, String> {
    let book = books.snapshot(session_id);
    let document = export::export_book(&book, ExportOptions { include_summary }).map_err(|e| e.to_string())?;

    write(
        &document,
        session_id,
        export_dir,
        export_file_name(file_name, DEFAULT_BOOK_FILE),
        book.len(),
        inline,
    )
    .map_err(|e| format!("Export failed: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversion::ConversionTable;
    use crate::models::{price, DishHeader, IngredientInput};

    fn books_with(names: &[&str]) -> SessionBooks {
        let table = ConversionTable::standard().unwrap();
        let books = SessionBooks::new();
        for name in names {
            let recipe = price(
                &DishHeader::new(name, 2),
                &[IngredientInput::new("Milk", 500.0, "ml", 60.0, "L")],
                &table,
            )
            .unwrap();
            books.add("s1", recipe);
        }
        books
    }

    #[test]
    fn test_export_file_name() {
        assert_eq!(export_file_name(None, DEFAULT_BOOK_FILE), "recipe_book.xlsx");
        assert_eq!(export_file_name(Some("dinner"), DEFAULT_BOOK_FILE), "dinner.xlsx");
        assert_eq!(export_file_name(Some("dinner.xlsx"), DEFAULT_BOOK_FILE), "dinner.xlsx");
        assert_eq!(export_file_name(Some("../../etc/passwd"), DEFAULT_BOOK_FILE), "passwd.xlsx");
        assert_eq!(export_file_name(Some("a\\b:c"), DEFAULT_BOOK_FILE), "b_c.xlsx");
        assert_eq!(export_file_name(Some(".."), DEFAULT_BOOK_FILE), "recipe_book.xlsx");
        assert_eq!(export_file_name(Some("  "), DEFAULT_RECIPE_FILE), "recipe_cost.xlsx");
    }

    #[test]
    fn test_export_book_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let books = books_with(&["Tea", "Tea"]);

        let response = export_book(&books, dir.path(), "s1", true, None, false).unwrap();

        assert_eq!(response.sheets, vec!["Tea", "Tea (2)", "Summary"]);
        assert_eq!(response.recipes, 2);
        assert!(response.content_base64.is_none());
        assert!(dir.path().join(DEFAULT_BOOK_FILE).exists());
    }

    #[test]
    fn test_export_recipe_defaults_to_latest_and_inlines() {
        let dir = tempfile::tempdir().unwrap();
        let books = books_with(&["Tea", "Coffee"]);

        let response = export_recipe(&books, dir.path(), "s1", None, Some("latest"), true).unwrap();

        assert_eq!(response.sheets, vec!["Coffee"]);
        let decoded = base64::engine::general_purpose::STANDARD
            .decode(response.content_base64.unwrap())
            .unwrap();
        assert_eq!(decoded.len(), response.bytes);
        assert!(dir.path().join("latest.xlsx").exists());
    }

    #[test]
    fn test_export_errors_leave_book_intact() {
        let dir = tempfile::tempdir().unwrap();
        let books = books_with(&["Tea"]);

        assert!(export_recipe(&books, dir.path(), "s1", Some(5), None, false).is_err());
        assert!(export_book(&books, dir.path(), "nobody", true, None, false).is_err());
        assert!(export_recipe(&books, dir.path(), "nobody", None, None, false).is_err());
        assert_eq!(books.snapshot("s1").len(), 1);
    }
}
