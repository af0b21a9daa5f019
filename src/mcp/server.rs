//! Recipe Cost MCP Server Implementation
//!
//! Implements the MCP server with all recipe cost tools.

use std::path::PathBuf;
use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::conversion::ConversionTable;
use crate::db::Database;
use crate::models::{SavedIngredientCreate, SavedIngredientUpdate};
use crate::session::{SessionBooks, DEFAULT_SESSION};
use crate::tools::export;
use crate::tools::recipes::{self, IngredientRow, PriceRecipeRequest};
use crate::tools::saved_ingredients;
use crate::tools::status::StatusTracker;
use crate::tools::units;

/// Recipe Cost MCP Service
#[derive(Clone)]
pub struct RecipeCostService {
    status_tracker: Arc<Mutex<StatusTracker>>,
    database: Database,
    table: Arc<ConversionTable>,
    books: Arc<SessionBooks>,
    export_dir: PathBuf,
    tool_router: ToolRouter<RecipeCostService>,
}

impl RecipeCostService {
    pub fn new(database: Database, table: ConversionTable, export_dir: PathBuf) -> Self {
        let database_path = database.path().to_path_buf();
        Self {
            status_tracker: Arc::new(Mutex::new(StatusTracker::new(database_path, export_dir.clone()))),
            database,
            table: Arc::new(table),
            books: Arc::new(SessionBooks::new()),
            export_dir,
            tool_router: Self::tool_router(),
        }
    }
}

fn default_session() -> String { DEFAULT_SESSION.to_string() }
fn default_true() -> bool { true }
fn default_list_limit() -> i64 { 50 }

fn to_json<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value).map_err(|e| McpError::internal_error(e.to_string(), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

// ============================================================================
// Unit Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ConvertUnitParams {
    pub quantity: f64,
    pub from_unit: String,
    pub to_unit: String,
}

// ============================================================================
// Recipe Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct IngredientRowParams {
    pub name: String,
    pub quantity: f64,
    /// Unit the quantity is measured in; may be omitted when use_saved is true
    pub unit: Option<String>,
    /// Price of one price_basis_unit; may be omitted when use_saved is true
    pub unit_price: Option<f64>,
    /// Unit the price is quoted per; defaults to unit
    pub price_basis_unit: Option<String>,
    /// Take unit_price and price_basis_unit from the saved ingredient with this name
    #[serde(default)]
    pub use_saved: bool,
}

impl From<IngredientRowParams> for IngredientRow {
    fn from(p: IngredientRowParams) -> Self {
        Self {
            name: p.name,
            quantity: p.quantity,
            unit: p.unit,
            unit_price: p.unit_price,
            price_basis_unit: p.price_basis_unit,
            use_saved: p.use_saved,
        }
    }
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PriceRecipeParams {
    #[serde(default = "default_session")]
    pub session_id: String,
    pub dish_name: String,
    pub servings: i64,
    pub ingredients: Vec<IngredientRowParams>,
    /// Append the priced recipe to the session book (default true)
    #[serde(default = "default_true")]
    pub add_to_book: bool,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SessionParams {
    #[serde(default = "default_session")]
    pub session_id: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetBookRecipeParams {
    #[serde(default = "default_session")]
    pub session_id: String,
    /// Zero-based position in the book
    pub index: usize,
}

// ============================================================================
// Export Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ExportRecipeParams {
    #[serde(default = "default_session")]
    pub session_id: String,
    /// Zero-based position in the book; defaults to the most recent recipe
    pub index: Option<usize>,
    /// File name inside the export directory (default recipe_cost.xlsx)
    pub file_name: Option<String>,
    /// Also return the workbook as base64
    #[serde(default)]
    pub inline: bool,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ExportBookParams {
    #[serde(default = "default_session")]
    pub session_id: String,
    #[serde(default = "default_true")]
    pub include_summary: bool,
    /// File name inside the export directory (default recipe_book.xlsx)
    pub file_name: Option<String>,
    #[serde(default)]
    pub inline: bool,
}

// ============================================================================
// Saved Ingredient Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AddSavedIngredientParams {
    pub name: String,
    /// Unit the ingredient is sold by, e.g. kg or litre
    pub unit: String,
    /// Price of one unit
    pub price_per_unit: f64,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetSavedIngredientParams {
    pub id: Option<i64>,
    pub name: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListSavedIngredientsParams {
    /// Substring to match against names
    pub query: Option<String>,
    #[serde(default = "default_list_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UpdateSavedIngredientParams {
    pub id: i64,
    pub name: Option<String>,
    pub unit: Option<String>,
    pub price_per_unit: Option<f64>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DeleteSavedIngredientParams {
    pub id: i64,
}

// ============================================================================
// Tool Router
// ============================================================================

#[tool_router]
impl RecipeCostService {
    // --- Status ---

    #[tool(description = "Get the current status of the recipe cost service including build info, database status, open sessions, and process information")]
    async fn recipe_cost_status(&self) -> Result<CallToolResult, McpError> {
        let tracker = self.status_tracker.lock().await;
        let status = tracker.get_status(self.books.session_count(), self.table.len());
        to_json(&status)
    }

    #[tool(description = "Get step-by-step instructions for pricing recipes. Call this when starting a costing session or when unsure how to use the tools.")]
    fn costing_instructions(&self) -> Result<CallToolResult, McpError> {
        use crate::tools::status::COSTING_INSTRUCTIONS;
        Ok(CallToolResult::success(vec![Content::text(COSTING_INSTRUCTIONS)]))
    }

    // --- Units ---

    #[tool(description = "List supported units, their accepted spellings, and every declared conversion factor")]
    fn list_units(&self) -> Result<CallToolResult, McpError> {
        to_json(&units::list_units(&self.table))
    }

    #[tool(description = "Convert a quantity between two units. Only declared pairs convert; a unit always converts to itself.")]
    fn convert_unit(&self, Parameters(p): Parameters<ConvertUnitParams>) -> Result<CallToolResult, McpError> {
        let result = units::convert_unit(&self.table, p.quantity, &p.from_unit, &p.to_unit)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    // --- Recipes ---

    #[tool(description = "Price a dish from its ingredient rows and add it to the session's recipe book. Invalid input is rejected as a whole with every problem listed.")]
    fn price_recipe(&self, Parameters(p): Parameters<PriceRecipeParams>) -> Result<CallToolResult, McpError> {
        let request = PriceRecipeRequest {
            session_id: p.session_id,
            dish_name: p.dish_name,
            servings: p.servings,
            ingredients: p.ingredients.into_iter().map(IngredientRow::from).collect(),
            add_to_book: p.add_to_book,
        };
        let result = recipes::price_recipe(&self.database, &self.table, &self.books, request)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "List the recipes in a session's book with their totals")]
    fn list_book(&self, Parameters(p): Parameters<SessionParams>) -> Result<CallToolResult, McpError> {
        to_json(&recipes::list_book(&self.books, &p.session_id))
    }

    #[tool(description = "Get one priced recipe from a session's book by its zero-based position")]
    fn get_book_recipe(&self, Parameters(p): Parameters<GetBookRecipeParams>) -> Result<CallToolResult, McpError> {
        let result = recipes::get_book_recipe(&self.books, &p.session_id, p.index);
        let json = match result {
            Some(recipe) => serde_json::to_string_pretty(&recipe),
            None => Ok(format!(r#"{{"error": "Recipe not found", "index": {}}}"#, p.index)),
        }.map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "End a session, discarding its recipe book")]
    fn end_session(&self, Parameters(p): Parameters<SessionParams>) -> Result<CallToolResult, McpError> {
        to_json(&recipes::end_session(&self.books, &p.session_id))
    }

    // --- Export ---

    #[tool(description = "Export one recipe from the session book to an xlsx file. Defaults to the most recently priced recipe.")]
    fn export_recipe(&self, Parameters(p): Parameters<ExportRecipeParams>) -> Result<CallToolResult, McpError> {
        let result = export::export_recipe(
            &self.books,
            &self.export_dir,
            &p.session_id,
            p.index,
            p.file_name.as_deref(),
            p.inline,
        )
        .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Export the whole session book to an xlsx file, one sheet per recipe plus an optional Summary sheet")]
    fn export_book(&self, Parameters(p): Parameters<ExportBookParams>) -> Result<CallToolResult, McpError> {
        let result = export::export_book(
            &self.books,
            &self.export_dir,
            &p.session_id,
            p.include_summary,
            p.file_name.as_deref(),
            p.inline,
        )
        .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    // --- Saved Ingredients ---

    #[tool(description = "Save an ingredient price (price per one unit) for reuse in recipes")]
    fn add_saved_ingredient(&self, Parameters(p): Parameters<AddSavedIngredientParams>) -> Result<CallToolResult, McpError> {
        let data = SavedIngredientCreate {
            name: p.name,
            unit: p.unit,
            price_per_unit: p.price_per_unit,
            notes: p.notes,
        };
        let result = saved_ingredients::add_saved_ingredient(&self.database, data)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Get a saved ingredient by id or by name (case-insensitive)")]
    fn get_saved_ingredient(&self, Parameters(p): Parameters<GetSavedIngredientParams>) -> Result<CallToolResult, McpError> {
        let result = saved_ingredients::get_saved_ingredient(&self.database, p.id, p.name.as_deref())
            .map_err(|e| McpError::internal_error(e, None))?;
        let json = match result {
            Some(item) => serde_json::to_string_pretty(&item),
            None => Ok(r#"{"error": "Saved ingredient not found"}"#.to_string()),
        }.map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "List saved ingredients with optional name filter and pagination")]
    fn list_saved_ingredients(&self, Parameters(p): Parameters<ListSavedIngredientsParams>) -> Result<CallToolResult, McpError> {
        let result = saved_ingredients::list_saved_ingredients(&self.database, p.query.as_deref(), p.limit, p.offset)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Update a saved ingredient. Recipes already in a book keep the price they were priced with.")]
    fn update_saved_ingredient(&self, Parameters(p): Parameters<UpdateSavedIngredientParams>) -> Result<CallToolResult, McpError> {
        let data = SavedIngredientUpdate {
            name: p.name,
            unit: p.unit,
            price_per_unit: p.price_per_unit,
            notes: p.notes,
        };
        let result = saved_ingredients::update_saved_ingredient(&self.database, p.id, data)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Delete a saved ingredient")]
    fn delete_saved_ingredient(&self, Parameters(p): Parameters<DeleteSavedIngredientParams>) -> Result<CallToolResult, McpError> {
        let result = saved_ingredients::delete_saved_ingredient(&self.database, p.id)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }
}

// ============================================================================
// Server Handler
// ============================================================================

#[tool_handler]
impl ServerHandler for RecipeCostService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "recipe-cost".into(),
                version: crate::build_info::VERSION.into(),
                title: Some("Recipe Cost Calculator".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Recipe Cost Calculator - ingredient costing with unit conversion and xlsx recipe books. \
                 IMPORTANT: Call costing_instructions before pricing the first dish. \
                 Units: list_units, convert_unit. \
                 Recipes: price_recipe (adds to the session book), list_book, get_book_recipe, end_session. \
                 Export: export_recipe, export_book (one sheet per dish plus Summary). \
                 Saved prices: add/get/list/update/delete_saved_ingredient. \
                 Every book tool takes an optional session_id (default \"default\")."
                    .into(),
            ),
        }
    }
}
