//! Worksheet naming
//!
//! xlsx sheet names are at most 31 characters, cannot contain `[ ] : * ? / \`,
//! cannot start or end with an apostrophe, and must be unique ignoring case.
//! Dish names are free text, so they are cleaned, truncated, and suffixed with
//! ` (2)`, ` (3)`, ... when two of them land on the same name.

use std::collections::HashSet;

use super::ExportError;

/// Maximum sheet name length accepted by spreadsheet applications
pub const MAX_SHEET_NAME_CHARS: usize = 31;

/// Name used when a dish name has nothing usable left
const FALLBACK_NAME: &str = "Recipe";

/// Give up after this many suffixes for one base name
const MAX_SUFFIX: usize = 9999;

const FORBIDDEN: [char; 7] = ['[', ']', ':', '*', '?', '/', '\\'];

/// Clean a dish name into something a worksheet can be called
pub fn sanitize(name: &str) -> String {
    let replaced: String = name
        .chars()
        .map(|c| if FORBIDDEN.contains(&c) || c.is_control() { '_' } else { c })
        .collect();

    let trimmed = replaced.trim().trim_matches('\'').trim();
    if trimmed.is_empty() {
        return FALLBACK_NAME.to_string();
    }

    truncate(trimmed, MAX_SHEET_NAME_CHARS)
}

fn truncate(s: &str, max_chars: usize) -> String {
    let cut: String = s.chars().take(max_chars).collect();
    // Truncation can expose a trailing apostrophe or space
    let cleaned = cut.trim_end().trim_end_matches('\'');
    if cleaned.is_empty() {
        FALLBACK_NAME.to_string()
    } else {
        cleaned.to_string()
    }
}

/// Hands out unique sheet names in request order
#[derive(Debug, Default)]
pub struct SheetNamer {
    taken: HashSet<String>,
}

impl SheetNamer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim a name up front so dish names cannot take it
    pub fn reserve(&mut self, name: &str) {
        self.taken.insert(name.to_lowercase());
    }

    /// Unique sheet name for a dish
    pub fn assign(&mut self, dish_name: &str) -> Result<String, ExportError> {
        let base = sanitize(dish_name);
        if self.taken.insert(base.to_lowercase()) {
            return Ok(base);
        }

        for k in 2..=MAX_SUFFIX {
            let suffix = format!(" ({k})");
            let room = MAX_SHEET_NAME_CHARS - suffix.chars().count();
            let candidate = format!("{}{}", truncate(&base, room), suffix);

            if self.taken.insert(candidate.to_lowercase()) {
                tracing::debug!(dish = dish_name, sheet = %candidate, "Disambiguated sheet name");
                return Ok(candidate);
            }
        }

        Err(ExportError::SheetNames {
            dish_name: dish_name.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_keeps_plain_names() {
        assert_eq!(sanitize("Dal Tadka"), "Dal Tadka");
    }

    #[test]
    fn test_sanitize_replaces_forbidden_characters() {
        assert_eq!(sanitize("Mac/Cheese [v2]?"), "Mac_Cheese _v2__");
        assert_eq!(sanitize("'Quoted'"), "Quoted");
        assert_eq!(sanitize("   "), "Recipe");
        assert_eq!(sanitize("''"), "Recipe");
    }

    #[test]
    fn test_sanitize_truncates_to_limit() {
        let long = "Paneer Butter Masala with Garlic Naan and Jeera Rice";
        let name = sanitize(long);
        assert_eq!(name.chars().count(), MAX_SHEET_NAME_CHARS);
        assert!(long.starts_with(&name));
    }

    #[test]
    fn test_truncation_counts_characters_not_bytes() {
        let name = sanitize(&"é".repeat(40));
        assert_eq!(name.chars().count(), MAX_SHEET_NAME_CHARS);
    }

    #[test]
    fn test_duplicate_names_are_suffixed() {
        let mut namer = SheetNamer::new();
        assert_eq!(namer.assign("Dal Tadka").unwrap(), "Dal Tadka");
        assert_eq!(namer.assign("Dal Tadka").unwrap(), "Dal Tadka (2)");
        assert_eq!(namer.assign("dal tadka").unwrap(), "dal tadka (3)");
    }

    #[test]
    fn test_truncation_collisions_are_suffixed_within_limit() {
        let mut namer = SheetNamer::new();
        let a = namer.assign("Dal Tadka with Jeera Rice and Papad").unwrap();
        let b = namer.assign("Dal Tadka with Jeera Rice and Pickle").unwrap();

        assert_eq!(a, "Dal Tadka with Jeera Rice and P");
        assert_ne!(a.to_lowercase(), b.to_lowercase());
        assert!(b.chars().count() <= MAX_SHEET_NAME_CHARS);
        assert_eq!(b, "Dal Tadka with Jeera Rice a (2)");
    }

    #[test]
    fn test_reserved_names_are_skipped() {
        let mut namer = SheetNamer::new();
        namer.reserve("Summary");
        assert_eq!(namer.assign("summary").unwrap(), "summary (2)");
    }

    #[test]
    fn test_suffix_does_not_clash_with_existing_name() {
        let mut namer = SheetNamer::new();
        assert_eq!(namer.assign("Tea (2)").unwrap(), "Tea (2)");
        assert_eq!(namer.assign("Tea").unwrap(), "Tea");
        assert_eq!(namer.assign("Tea").unwrap(), "Tea (3)");
    }
}
