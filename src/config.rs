//! Runtime configuration
//!
//! Everything is read from environment variables, with defaults relative to the
//! project root.

use std::path::PathBuf;

/// Path of the saved ingredient database
pub const DATABASE_PATH_VAR: &str = "RECIPE_COST_DATABASE_PATH";
/// Directory exported workbooks are written to
pub const EXPORT_DIR_VAR: &str = "RECIPE_COST_EXPORT_DIR";

/// Resolved settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub database_path: PathBuf,
    pub export_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_path: database_path(),
            export_dir: export_dir(),
        }
    }
}

/// Directory containing the executable, or the project root when running from
/// `target/release` or `target/debug`
fn project_root() -> PathBuf {
    let mut path = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."));

    if path.ends_with("release") || path.ends_with("debug") {
        if let Some(grandparent) = path.parent().and_then(|p| p.parent()) {
            path = grandparent.to_path_buf();
        }
    }

    path
}

fn from_var(var: &str) -> Option<PathBuf> {
    std::env::var(var)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(PathBuf::from)
}

/// Get the database path from environment or use default
pub fn database_path() -> PathBuf {
    from_var(DATABASE_PATH_VAR).unwrap_or_else(|| project_root().join("data").join("recipe_cost.db"))
}

/// Get the export directory from environment or use default
pub fn export_dir() -> PathBuf {
    from_var(EXPORT_DIR_VAR).unwrap_or_else(|| project_root().join("exports"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_have_expected_file_names() {
        // Only checks the tail so the test does not depend on the environment
        let config = Config::from_env();
        if std::env::var(DATABASE_PATH_VAR).is_err() {
            assert!(config.database_path.ends_with("data/recipe_cost.db"));
        }
        if std::env::var(EXPORT_DIR_VAR).is_err() {
            assert!(config.export_dir.ends_with("exports"));
        }
    }
}
