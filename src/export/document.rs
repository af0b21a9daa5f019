//! Tabular export model
//!
//! Lays recipes out as named sheets of cells, independent of the file format.

use serde::Serialize;

use crate::models::{round_currency, Recipe, RecipeBook};
use super::sheet_names::SheetNamer;
use super::ExportError;

/// Name of the optional book summary sheet
pub const SUMMARY_SHEET_NAME: &str = "Summary";

/// Column headers of a recipe sheet
pub const RECIPE_HEADERS: [&str; 7] = [
    "Ingredient",
    "Quantity",
    "Unit",
    "Price Basis Unit",
    "Price per Unit",
    "Converted Quantity",
    "Cost",
];

/// Column headers of the summary sheet
pub const SUMMARY_HEADERS: [&str; 6] = [
    "Dish",
    "Sheet",
    "Servings",
    "Total Cost",
    "Cost per Serving",
    "Complete",
];

/// Shown in place of a converted quantity or cost that could not be computed
pub const UNRESOLVED: &str = "unresolved";

pub const TOTAL_COST_LABEL: &str = "Total Cost";
pub const SERVINGS_LABEL: &str = "Number of People";
pub const COST_PER_SERVING_LABEL: &str = "Cost per Serving";
pub const UNRESOLVED_LABEL: &str = "Unresolved Lines";
pub const BOOK_TOTAL_LABEL: &str = "Book Total";

/// A single cell value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Text(String),
    Number(f64),
    Empty,
}

impl Cell {
    pub fn text(s: impl Into<String>) -> Self {
        Cell::Text(s.into())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(n) => Some(*n),
            _ => None,
        }
    }
}

/// A named grid of cells; an empty row is a blank line
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sheet {
    pub name: String,
    pub rows: Vec<Vec<Cell>>,
}

impl Sheet {
    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        self.rows.get(row).and_then(|r| r.get(col))
    }

    /// Row index of the first row whose first cell is `label`
    pub fn find_label(&self, label: &str) -> Option<usize> {
        self.rows
            .iter()
            .position(|r| r.first().and_then(Cell::as_text) == Some(label))
    }
}

/// Format-independent workbook
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TabularDocument {
    pub sheets: Vec<Sheet>,
}

impl TabularDocument {
    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name == name)
    }

    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name.as_str()).collect()
    }
}

/// Book export settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportOptions {
    pub include_summary: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            include_summary: true,
        }
    }
}

/// Ingredient rows followed by the footer, starting two rows below the last line
fn recipe_rows(recipe: &Recipe) -> Vec<Vec<Cell>> {
    let mut rows = Vec::with_capacity(recipe.lines().len() + 6);
    rows.push(RECIPE_HEADERS.iter().map(|h| Cell::text(*h)).collect());

    for line in recipe.lines() {
        let (converted, cost) = match (line.converted_quantity(), line.line_cost()) {
            (Some(q), Some(c)) => (Cell::Number(q), Cell::Number(round_currency(c))),
            _ => (Cell::text(UNRESOLVED), Cell::text(UNRESOLVED)),
        };

        rows.push(vec![
            Cell::text(line.name.as_str()),
            Cell::Number(line.quantity),
            Cell::text(line.unit.as_str()),
            Cell::text(line.price_basis_unit.as_str()),
            Cell::Number(line.unit_price),
            converted,
            cost,
        ]);
    }

    rows.push(Vec::new());
    rows.push(vec![Cell::text(TOTAL_COST_LABEL), Cell::Number(recipe.display_total())]);
    rows.push(vec![Cell::text(SERVINGS_LABEL), Cell::Number(f64::from(recipe.servings))]);
    rows.push(vec![
        Cell::text(COST_PER_SERVING_LABEL),
        Cell::Number(recipe.display_cost_per_serving()),
    ]);

    let unresolved = recipe.unresolved_lines().count();
    if unresolved > 0 {
        rows.push(vec![Cell::text(UNRESOLVED_LABEL), Cell::Number(unresolved as f64)]);
    }

    rows
}

/// One sheet holding a single recipe
pub fn export_recipe(recipe: &Recipe) -> Result<TabularDocument, ExportError> {
    let name = SheetNamer::new().assign(&recipe.dish_name)?;
    Ok(TabularDocument {
        sheets: vec![Sheet {
            name,
            rows: recipe_rows(recipe),
        }],
    })
}

/// One sheet per recipe in book order, plus an optional summary sheet
pub fn export_book(book: &RecipeBook, options: ExportOptions) -> Result<TabularDocument, ExportError> {
    if book.is_empty() {
        return Err(ExportError::EmptyBook);
    }

    let mut namer = SheetNamer::new();
    if options.include_summary {
        namer.reserve(SUMMARY_SHEET_NAME);
    }

    let mut sheets = Vec::with_capacity(book.len() + 1);
    for recipe in book {
        let name = namer.assign(&recipe.dish_name)?;
        sheets.push(Sheet {
            name,
            rows: recipe_rows(recipe),
        });
    }

    if options.include_summary {
        let mut rows: Vec<Vec<Cell>> = vec![SUMMARY_HEADERS.iter().map(|h| Cell::text(*h)).collect()];
        for (recipe, sheet) in book.iter().zip(&sheets) {
            rows.push(vec![
                Cell::text(recipe.dish_name.as_str()),
                Cell::text(sheet.name.as_str()),
                Cell::Number(f64::from(recipe.servings)),
                Cell::Number(recipe.display_total()),
                Cell::Number(recipe.display_cost_per_serving()),
                Cell::text(if recipe.is_complete() { "yes" } else { "no" }),
            ]);
        }
        rows.push(Vec::new());
        rows.push(vec![
            Cell::text(BOOK_TOTAL_LABEL),
            Cell::Empty,
            Cell::Empty,
            Cell::Number(round_currency(book.total_cost())),
        ]);

        sheets.push(Sheet {
            name: SUMMARY_SHEET_NAME.to_string(),
            rows,
        });
    }

    tracing::debug!(sheets = sheets.len(), "Laid out recipe book");
    Ok(TabularDocument { sheets })
}
