//! Recipe MCP Tools
//!
//! Pricing a dish, and reading back the session's recipe book.

use std::collections::HashSet;

use rusqlite::Connection;
use serde::Serialize;

use crate::conversion::ConversionTable;
use crate::db::Database;
use crate::models::{
    price, round_currency, validate, DishHeader, Field, FieldViolation, IngredientInput,
    IngredientLine, LineCost, Recipe, SavedIngredient,
};
use crate::session::SessionBooks;

/// One ingredient row as received from a caller
#[derive(Debug, Clone, Default)]
pub struct IngredientRow {
    pub name: String,
    pub quantity: f64,
    pub unit: Option<String>,
    pub unit_price: Option<f64>,
    pub price_basis_unit: Option<String>,
    /// Take unit price and price basis from the saved ingredient of this name
    pub use_saved: bool,
}

/// Everything needed to price one dish
#[derive(Debug, Clone)]
pub struct PriceRecipeRequest {
    pub session_id: String,
    pub dish_name: String,
    pub servings: i64,
    pub ingredients: Vec<IngredientRow>,
    pub add_to_book: bool,
}

/// A priced line for display
#[derive(Debug, Serialize)]
pub struct LineResponse {
    pub name: String,
    pub quantity: f64,
    pub unit: String,
    pub unit_price: f64,
    pub price_basis_unit: String,
    pub converted_quantity: Option<f64>,
    pub cost: Option<f64>,
    pub resolved: bool,
    pub error: Option<String>,
}

impl From<&IngredientLine> for LineResponse {
    fn from(line: &IngredientLine) -> Self {
        let (converted_quantity, cost, error) = match &line.cost {
            LineCost::Resolved { converted_quantity, cost } => {
                (Some(*converted_quantity), Some(round_currency(*cost)), None)
            }
            LineCost::Unresolved { error } => (None, None, Some(error.to_string())),
        };

        Self {
            name: line.name.clone(),
            quantity: line.quantity,
            unit: line.unit.clone(),
            unit_price: line.unit_price,
            price_basis_unit: line.price_basis_unit.clone(),
            converted_quantity,
            cost,
            resolved: error.is_none(),
            error,
        }
    }
}

/// Where a recipe landed in the session book
#[derive(Debug, Serialize)]
pub struct BookPlacement {
    pub session_id: String,
    pub index: usize,
    pub entries: usize,
}

/// Full priced recipe
#[derive(Debug, Serialize)]
pub struct RecipeResponse {
    pub dish_name: String,
    pub servings: u32,
    pub lines: Vec<LineResponse>,
    pub total_cost: f64,
    pub cost_per_serving: f64,
    pub complete: bool,
    pub unresolved_count: usize,
    pub warning: Option<String>,
    pub created_at: String,
    pub book: Option<BookPlacement>,
}

impl RecipeResponse {
    pub fn from_recipe(recipe: &Recipe) -> Self {
        let unresolved_count = recipe.unresolved_lines().count();
        let warning = (unresolved_count > 0).then(|| {
            format!(
                "{} ingredient(s) could not be converted to their price unit; total cost excludes them",
                unresolved_count
            )
        });

        Self {
            dish_name: recipe.dish_name.clone(),
            servings: recipe.servings,
            lines: recipe.lines().iter().map(LineResponse::from).collect(),
            total_cost: recipe.display_total(),
            cost_per_serving: recipe.display_cost_per_serving(),
            complete: recipe.is_complete(),
            unresolved_count,
            warning,
            created_at: recipe.created_at.to_rfc3339(),
            book: None,
        }
    }
}

/// Response when input is rejected
#[derive(Debug, Serialize)]
pub struct ValidationRejectedResponse {
    pub error: String,
    pub violations: Vec<FieldViolation>,
}

/// Result of price_recipe
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum PriceRecipeOutcome {
    Priced(RecipeResponse),
    Rejected(ValidationRejectedResponse),
}

/// Caller rows turned into ingredient inputs
struct ResolvedRows {
    inputs: Vec<IngredientInput>,
    violations: Vec<FieldViolation>,
    /// Fields already reported, or filled with a placeholder, per row
    covered: HashSet<(usize, Field)>,
}

/// Turn caller rows into ingredient inputs, looking up saved ingredients
///
/// Rows that cannot be resolved get a violation and a placeholder input so the
/// remaining fields can still be validated.
fn resolve_rows(conn: Option<&Connection>, rows: &[IngredientRow]) -> Result<ResolvedRows, String> {
    let mut inputs = Vec::with_capacity(rows.len());
    let mut violations = Vec::new();
    let mut covered = HashSet::new();

    for (i, row) in rows.iter().enumerate() {
        if row.use_saved {
            let saved = match conn {
                Some(conn) => SavedIngredient::find_by_name(conn, &row.name)
                    .map_err(|e| format!("Database error: {}", e))?,
                None => None,
            };

            match saved {
                Some(saved) => {
                    let mut input = saved.to_input(row.quantity, row.unit.as_deref());
                    if let Some(basis) = row.price_basis_unit.as_deref().filter(|b| !b.trim().is_empty()) {
                        // A caller-chosen basis only makes sense with the caller's price
                        if row.unit_price.is_some() {
                            input.price_basis_unit = Some(basis.to_string());
                        }
                    }
                    if let Some(price) = row.unit_price {
                        input.unit_price = price;
                    }
                    inputs.push(input);
                }
                None => {
                    violations.push(FieldViolation::row(
                        i,
                        Field::Name,
                        format!("no saved ingredient named '{}'", row.name.trim()),
                    ));
                    covered.insert((i, Field::Name));
                    // Price and unit would have come from the saved entry
                    if row.unit_price.is_none() {
                        covered.insert((i, Field::UnitPrice));
                    }
                    if row.unit.is_none() {
                        covered.insert((i, Field::Unit));
                    }
                    inputs.push(placeholder(row));
                }
            }
            continue;
        }

        let unit_price = match row.unit_price {
            Some(price) => price,
            None => {
                violations.push(FieldViolation::row(
                    i,
                    Field::UnitPrice,
                    "is required unless use_saved is set",
                ));
                covered.insert((i, Field::UnitPrice));
                0.0
            }
        };

        inputs.push(IngredientInput {
            name: row.name.clone(),
            quantity: row.quantity,
            unit: row.unit.clone().unwrap_or_default(),
            unit_price,
            price_basis_unit: row.price_basis_unit.clone(),
        });
    }

    Ok(ResolvedRows {
        inputs,
        violations,
        covered,
    })
}

fn placeholder(row: &IngredientRow) -> IngredientInput {
    IngredientInput {
        name: row.name.clone(),
        quantity: row.quantity,
        unit: row.unit.clone().unwrap_or_default(),
        unit_price: 0.0,
        price_basis_unit: None,
    }
}

/// Price a dish, optionally adding it to the session book
pub fn price_recipe(
    db: &Database,
    table: &ConversionTable,
    books: &SessionBooks,
    request: PriceRecipeRequest,
) -> Result<PriceRecipeOutcome, String> {
    let dish = DishHeader {
        name: request.dish_name,
        servings: request.servings,
    };

    let conn = if request.ingredients.iter().any(|r| r.use_saved) {
        Some(db.get_conn().map_err(|e| format!("Database error: {}", e))?)
    } else {
        None
    };

    let ResolvedRows {
        inputs,
        mut violations,
        covered,
    } = resolve_rows(conn.as_deref(), &request.ingredients)?;

    if let Err(e) = validate(&dish, &inputs) {
        violations.extend(
            e.violations
                .into_iter()
                .filter(|v| v.row.map_or(true, |r| !covered.contains(&(r, v.field)))),
        );
    }

    if !violations.is_empty() {
        violations.sort_by_key(|v| v.row.map_or(0, |r| r + 1));
        tracing::info!(dish = %dish.name, violations = violations.len(), "Rejected recipe input");
        return Ok(PriceRecipeOutcome::Rejected(ValidationRejectedResponse {
            error: format!("{} invalid field(s); nothing was priced", violations.len()),
            violations,
        }));
    }

    let recipe = price(&dish, &inputs, table).map_err(|e| e.to_string())?;
    let mut response = RecipeResponse::from_recipe(&recipe);

    if request.add_to_book {
        let (index, entries) = books.add(&request.session_id, recipe);
        response.book = Some(BookPlacement {
            session_id: request.session_id,
            index,
            entries,
        });
    }

    Ok(PriceRecipeOutcome::Priced(response))
}

// ============================================================================
// Book Tools
// ============================================================================

/// One book entry in a listing
#[derive(Debug, Serialize)]
pub struct BookEntrySummary {
    pub index: usize,
    pub dish_name: String,
    pub servings: u32,
    pub ingredient_count: usize,
    pub total_cost: f64,
    pub cost_per_serving: f64,
    pub complete: bool,
    pub created_at: String,
}

/// Response for list_book
#[derive(Debug, Serialize)]
pub struct ListBookResponse {
    pub session_id: String,
    pub entries: Vec<BookEntrySummary>,
    pub count: usize,
    pub book_total: f64,
    pub complete: bool,
}

/// Response for end_session
#[derive(Debug, Serialize)]
pub struct EndSessionResponse {
    pub session_id: String,
    pub discarded_recipes: usize,
}

pub fn list_book(books: &SessionBooks, session_id: &str) -> ListBookResponse {
    let book = books.snapshot(session_id);
    let entries: Vec<BookEntrySummary> = book
        .iter()
        .enumerate()
        .map(|(index, r)| BookEntrySummary {
            index,
            dish_name: r.dish_name.clone(),
            servings: r.servings,
            ingredient_count: r.lines().len(),
            total_cost: r.display_total(),
            cost_per_serving: r.display_cost_per_serving(),
            complete: r.is_complete(),
            created_at: r.created_at.to_rfc3339(),
        })
        .collect();

    ListBookResponse {
        session_id: session_id.to_string(),
        count: entries.len(),
        entries,
        book_total: round_currency(book.total_cost()),
        complete: book.is_complete(),
    }
}

pub fn get_book_recipe(books: &SessionBooks, session_id: &str, index: usize) -> Option<RecipeResponse> {
    books
        .snapshot(session_id)
        .get(index)
        .map(RecipeResponse::from_recipe)
}

pub fn end_session(books: &SessionBooks, session_id: &str) -> EndSessionResponse {
    EndSessionResponse {
        session_id: session_id.to_string(),
        discarded_recipes: books.end_session(session_id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixture {
        _dir: tempfile::TempDir,
        db: Database,
        table: ConversionTable,
        books: SessionBooks,
    }

    fn fixture() -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open_and_migrate(dir.path().join("catalog.db")).unwrap();
        Fixture {
            _dir: dir,
            db,
            table: ConversionTable::standard().unwrap(),
            books: SessionBooks::new(),
        }
    }

    fn row(name: &str, quantity: f64, unit: &str, unit_price: f64, basis: &str) -> IngredientRow {
        IngredientRow {
            name: name.to_string(),
            quantity,
            unit: Some(unit.to_string()),
            unit_price: Some(unit_price),
            price_basis_unit: Some(basis.to_string()),
            use_saved: false,
        }
    }

    fn request(dish: &str, servings: i64, ingredients: Vec<IngredientRow>) -> PriceRecipeRequest {
        PriceRecipeRequest {
            session_id: "test".to_string(),
            dish_name: dish.to_string(),
            servings,
            ingredients,
            add_to_book: true,
        }
    }

    fn priced(outcome: PriceRecipeOutcome) -> RecipeResponse {
        match outcome {
            PriceRecipeOutcome::Priced(r) => r,
            PriceRecipeOutcome::Rejected(r) => panic!("rejected: {}", r.error),
        }
    }

    fn rejected(outcome: PriceRecipeOutcome) -> ValidationRejectedResponse {
        match outcome {
            PriceRecipeOutcome::Rejected(r) => r,
            PriceRecipeOutcome::Priced(r) => panic!("unexpectedly priced {}", r.dish_name),
        }
    }

    #[test]
    fn test_price_tea_and_add_to_book() {
        let f = fixture();
        let outcome = price_recipe(
            &f.db,
            &f.table,
            &f.books,
            request("Tea", 2, vec![row("Milk", 500.0, "ml", 60.0, "L")]),
        )
        .unwrap();

        let response = priced(outcome);
        assert_eq!(response.total_cost, 30.0);
        assert_eq!(response.cost_per_serving, 15.0);
        assert_eq!(response.lines[0].cost, Some(30.0));
        assert!(response.complete);
        let book = response.book.unwrap();
        assert_eq!((book.index, book.entries), (0, 1));
    }

    #[test]
    fn test_saved_ingredient_rows() {
        let f = fixture();
        let mut flour = IngredientRow {
            name: "flour".to_string(),
            quantity: 500.0,
            unit: Some("g".to_string()),
            use_saved: true,
            ..Default::default()
        };
        let outcome = price_recipe(&f.db, &f.table, &f.books, request("Roti", 4, vec![flour.clone()])).unwrap();
        let response = priced(outcome);
        assert_eq!(response.lines[0].name, "Flour");
        assert_eq!(response.lines[0].price_basis_unit, "kg");
        assert_eq!(response.total_cost, 20.0);

        flour.name = "Saffron".to_string();
        let outcome = price_recipe(&f.db, &f.table, &f.books, request("Roti", 4, vec![flour])).unwrap();
        let response = rejected(outcome);
        assert_eq!(response.violations.len(), 1);
        assert_eq!(response.violations[0].field, Field::Name);
    }

    #[test]
    fn test_every_violation_reported_once() {
        let f = fixture();
        let mut missing_price = row("Sugar", 1.0, "kg", 0.0, "kg");
        missing_price.unit_price = None;

        let outcome = price_recipe(
            &f.db,
            &f.table,
            &f.books,
            request(
                "",
                0,
                vec![row("Milk", -2.0, "ml", 60.0, "L"), missing_price, row("Rice", 1.0, "kg", -1.0, "kg")],
            ),
        )
        .unwrap();

        let response = rejected(outcome);
        let fields: Vec<(Option<usize>, Field)> = response.violations.iter().map(|v| (v.row, v.field)).collect();
        assert_eq!(
            fields,
            vec![
                (None, Field::DishName),
                (None, Field::Servings),
                (Some(0), Field::Quantity),
                (Some(1), Field::UnitPrice),
                (Some(2), Field::UnitPrice),
            ]
        );
        assert!(f.books.snapshot("test").is_empty());
    }

    #[test]
    fn test_resolution_problems_do_not_hide_other_fields() {
        let f = fixture();
        let mut unpriced = row("Sugar", -5.0, "kg", 0.0, "kg");
        unpriced.unit_price = None;
        let unknown_saved = IngredientRow {
            name: "Saffron".to_string(),
            quantity: f64::NAN,
            use_saved: true,
            ..Default::default()
        };
        let mut negative_saved = unknown_saved.clone();
        negative_saved.name = "Cardamom".to_string();
        negative_saved.quantity = -1.0;
        negative_saved.unit = Some("g".to_string());

        let outcome = price_recipe(
            &f.db,
            &f.table,
            &f.books,
            request("Kesar Kulfi", 4, vec![unpriced, unknown_saved, negative_saved]),
        )
        .unwrap();

        let response = rejected(outcome);
        let fields: Vec<(Option<usize>, Field)> = response.violations.iter().map(|v| (v.row, v.field)).collect();
        assert_eq!(
            fields,
            vec![
                (Some(0), Field::UnitPrice),
                (Some(0), Field::Quantity),
                (Some(1), Field::Name),
                (Some(1), Field::Quantity),
                (Some(2), Field::Name),
                (Some(2), Field::Quantity),
            ]
        );
    }

    #[test]
    fn test_unresolved_line_is_flagged() {
        let f = fixture();
        let outcome = price_recipe(
            &f.db,
            &f.table,
            &f.books,
            request(
                "Kheer",
                4,
                vec![row("Milk", 1.0, "L", 60.0, "L"), row("Rice", 1.0, "cup", 80.0, "L")],
            ),
        )
        .unwrap();

        let response = priced(outcome);
        assert!(!response.complete);
        assert_eq!(response.unresolved_count, 1);
        assert!(response.warning.is_some());
        assert_eq!(response.lines[1].cost, None);
        assert!(!response.lines[1].resolved);
        assert_eq!(response.total_cost, 60.0);
    }

    #[test]
    fn test_book_listing_and_end_session() {
        let f = fixture();
        for _ in 0..2 {
            price_recipe(&f.db, &f.table, &f.books, request("Tea", 2, vec![row("Milk", 500.0, "ml", 60.0, "L")]))
                .unwrap();
        }

        let listing = list_book(&f.books, "test");
        assert_eq!(listing.count, 2);
        assert_eq!(listing.book_total, 60.0);
        assert_eq!(listing.entries[1].index, 1);

        assert!(get_book_recipe(&f.books, "test", 1).is_some());
        assert!(get_book_recipe(&f.books, "test", 2).is_none());
        assert_eq!(list_book(&f.books, "other").count, 0);

        assert_eq!(end_session(&f.books, "test").discarded_recipes, 2);
        assert_eq!(list_book(&f.books, "test").count, 0);
    }
}
