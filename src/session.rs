//! Per-session recipe books
//!
//! Each session identifier owns one book. Books live only as long as the
//! process (or until the session is ended) and are never shared.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use crate::models::{add_to_book, Recipe, RecipeBook};

/// Session id used when a caller does not name one
pub const DEFAULT_SESSION: &str = "default";

/// Recipe books keyed by session identifier
#[derive(Default)]
pub struct SessionBooks {
    books: Mutex<HashMap<String, RecipeBook>>,
}

impl SessionBooks {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, RecipeBook>> {
        // A panic while holding the lock cannot leave a book half-appended
        self.books.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Append a recipe to a session's book, returning its position and the new length
    pub fn add(&self, session_id: &str, recipe: Recipe) -> (usize, usize) {
        let mut books = self.lock();
        let book = books.remove(session_id).unwrap_or_default();
        let book = add_to_book(book, recipe);
        let len = book.len();
        books.insert(session_id.to_string(), book);

        tracing::info!(session = session_id, entries = len, "Recipe added to book");
        (len - 1, len)
    }

    /// Copy of a session's book; empty if the session has none
    pub fn snapshot(&self, session_id: &str) -> RecipeBook {
        self.lock().get(session_id).cloned().unwrap_or_default()
    }

    /// Discard a session's book, returning how many recipes it held
    pub fn end_session(&self, session_id: &str) -> usize {
        let removed = self.lock().remove(session_id).map(|b| b.len()).unwrap_or(0);
        tracing::info!(session = session_id, discarded = removed, "Session ended");
        removed
    }

    /// Number of sessions holding a book
    pub fn session_count(&self) -> usize {
        self.lock().len()
    }
}
