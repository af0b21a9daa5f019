//! Price every dish in a JSON file and write the recipe book as xlsx
//!
//! Usage: cost_recipe_file <input.json> <output.xlsx> [--no-summary]
//!
//! The input is an array of dishes:
//! `[{"dish_name": "Tea", "servings": 2, "ingredients": [{"name": "Milk", "quantity": 500, "unit": "ml", "unit_price": 60, "price_basis_unit": "L"}]}]`

use std::path::PathBuf;

use serde::Deserialize;

use recipe_cost::conversion::ConversionTable;
use recipe_cost::export::{export_book, save_xlsx, ExportOptions};
use recipe_cost::models::{add_to_book, price, DishHeader, IngredientInput, RecipeBook};

#[derive(Debug, Deserialize)]
struct DishFile {
    dish_name: String,
    servings: i64,
    ingredients: Vec<IngredientInput>,
}

fn usage() -> ! {
    eprintln!("Usage: cost_recipe_file <input.json> <output.xlsx> [--no-summary]");
    std::process::exit(2);
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut include_summary = true;
    let mut paths = Vec::new();
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--no-summary" => include_summary = false,
            "-h" | "--help" => usage(),
            _ => paths.push(PathBuf::from(arg)),
        }
    }
    let [input, output] = <[PathBuf; 2]>::try_from(paths).unwrap_or_else(|_| usage());

    let table = ConversionTable::standard()?;
    let dishes: Vec<DishFile> = serde_json::from_str(&std::fs::read_to_string(&input)?)?;
    println!("Read {} dish(es) from {}", dishes.len(), input.display());

    let mut book = RecipeBook::new();
    for dish in dishes {
        let header = DishHeader::new(&dish.dish_name, dish.servings);
        let recipe = match price(&header, &dish.ingredients, &table) {
            Ok(recipe) => recipe,
            Err(e) => {
                eprintln!("'{}' rejected:", dish.dish_name);
                for violation in &e.violations {
                    eprintln!("  {}", violation);
                }
                return Err(e.into());
            }
        };

        let unresolved = recipe.unresolved_lines().count();
        println!(
            "  {}: total {:.2}, per serving {:.2}{}",
            recipe.dish_name,
            recipe.display_total(),
            recipe.display_cost_per_serving(),
            if unresolved > 0 {
                format!(" ({} unresolved line(s) excluded)", unresolved)
            } else {
                String::new()
            }
        );
        book = add_to_book(book, recipe);
    }

    let document = export_book(&book, ExportOptions { include_summary })?;
    let bytes = save_xlsx(&document, &output)?;
    println!(
        "Wrote {} sheet(s), {} bytes to {}",
        document.sheets.len(),
        bytes,
        output.display()
    );

    Ok(())
}
