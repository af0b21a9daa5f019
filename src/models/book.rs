//! Recipe book model
//!
//! An append-only, ordered collection of priced recipes for one session.

use serde::Serialize;

use super::recipe::Recipe;

/// Priced recipes in the order they were added
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RecipeBook {
    recipes: Vec<Recipe>,
}

impl RecipeBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a recipe and return the book
    pub fn with_recipe(mut self, recipe: Recipe) -> Self {
        self.push(recipe);
        self
    }

    /// Append a recipe in place, returning its position
    pub fn push(&mut self, recipe: Recipe) -> usize {
        self.recipes.push(recipe);
        self.recipes.len() - 1
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Recipe> {
        self.recipes.get(index)
    }

    pub fn last(&self) -> Option<&Recipe> {
        self.recipes.last()
    }

    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Recipe> {
        self.recipes.iter()
    }

    /// Sum of every recipe's unrounded total
    pub fn total_cost(&self) -> f64 {
        self.recipes.iter().map(Recipe::total_cost).sum()
    }

    /// True when every recipe in the book is complete
    pub fn is_complete(&self) -> bool {
        self.recipes.iter().all(Recipe::is_complete)
    }
}

impl<'a> IntoIterator for &'a RecipeBook {
    type Item = &'a Recipe;
    type IntoIter = std::slice::Iter<'a, Recipe>;

    fn into_iter(self) -> Self::IntoIter {
        self.recipes.iter()
    }
}

/// Add a recipe to the end of a book
///
/// Earlier entries are never touched, and a repeated dish name is just another
/// entry.
pub fn add_to_book(book: RecipeBook, recipe: Recipe) -> RecipeBook {
    tracing::debug!(dish = %recipe.dish_name, position = book.len(), "Adding recipe to book");
    book.with_recipe(recipe)
}
