//! Recipe Cost Calculator
//!
//! An MCP server for ingredient costing and recipe book exports.

use rmcp::ServiceExt;
use tokio::io::{stdin, stdout};
use tracing_subscriber::EnvFilter;

use recipe_cost::build_info;
use recipe_cost::config::Config;
use recipe_cost::conversion::ConversionTable;
use recipe_cost::db::Database;
use recipe_cost::mcp::RecipeCostService;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr; stdout carries the MCP stream
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("recipe_cost=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    build_info::print_startup_banner();
    eprintln!("Starting MCP server on stdio...");

    // Refuse to start on an inconsistent conversion table
    let table = ConversionTable::standard()?;
    eprintln!("Conversion table: {} declared factors", table.len());

    let config = Config::from_env();
    eprintln!("Database path: {}", config.database_path.display());
    eprintln!("Export directory: {}", config.export_dir.display());

    eprintln!("Initializing database...");
    let database = Database::open_and_migrate(&config.database_path)?;

    let service = RecipeCostService::new(database, table, config.export_dir);

    let transport = (stdin(), stdout());
    let server = service.serve(transport).await?;
    server.waiting().await?;

    Ok(())
}
