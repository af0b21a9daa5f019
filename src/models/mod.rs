//! Data models
//!
//! Ingredient lines, priced recipes, the recipe book, and saved ingredients.

mod book;
mod ingredient;
mod recipe;
mod saved_ingredient;
mod validation;

pub use book::{add_to_book, RecipeBook};
pub use ingredient::{IngredientInput, IngredientLine, LineCost};
pub use recipe::{price, round_currency, validate, DishHeader, Recipe};
pub use saved_ingredient::{SavedIngredient, SavedIngredientCreate, SavedIngredientUpdate};
pub use validation::{Field, FieldViolation, ValidationError};
