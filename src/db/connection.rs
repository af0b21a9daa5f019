//! Database connection management
//!
//! SQLite pool for the saved ingredient catalog.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::OpenFlags;
use thiserror::Error;

use super::migrations;

/// Database error types
#[derive(Debug, Error)]
pub enum DbError {
    #[error("Database connection error: {0}")]
    Connection(#[from] r2d2::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Could not prepare database directory: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for database operations
pub type DbResult<T> = Result<T, DbError>;

/// Catalog connection pool
#[derive(Clone)]
pub struct Database {
    pool: Arc<Pool<SqliteConnectionManager>>,
    path: PathBuf,
}

impl Database {
    /// Open (creating if needed) the database file
    pub fn new<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        let path = path.as_ref().to_path_buf();
        let manager = SqliteConnectionManager::file(&path)
            .with_flags(
                OpenFlags::SQLITE_OPEN_READ_WRITE
                    | OpenFlags::SQLITE_OPEN_CREATE
                    | OpenFlags::SQLITE_OPEN_URI,
            )
            .with_init(|conn| {
                conn.execute_batch(
                    "PRAGMA journal_mode = WAL;
                     PRAGMA synchronous = NORMAL;
                     PRAGMA temp_store = MEMORY;",
                )?;
                Ok(())
            });

        let pool = Pool::builder().max_size(4).build(manager)?;

        Ok(Self {
            pool: Arc::new(pool),
            path,
        })
    }

    /// Open the database, creating its directory and applying migrations
    pub fn open_and_migrate<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let database = Self::new(path)?;
        database.with_conn(|conn| {
            migrations::run_migrations(conn)?;
            let version = migrations::get_schema_version(conn)?;
            tracing::info!("Saved ingredient catalog at schema version {}", version);
            Ok(())
        })?;

        Ok(database)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get a connection from the pool
    pub fn get_conn(&self) -> DbResult<PooledConnection<SqliteConnectionManager>> {
        Ok(self.pool.get()?)
    }

    /// Execute a closure with a database connection
    pub fn with_conn<F, T>(&self, f: F) -> DbResult<T>
    where
        F: FnOnce(&rusqlite::Connection) -> DbResult<T>,
    {
        let conn = self.get_conn()?;
        f(&conn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_and_migrate_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("catalog.db");

        let database = Database::open_and_migrate(&path).unwrap();

        assert!(path.exists());
        assert_eq!(database.path(), path.as_path());
        let version = database.with_conn(|conn| migrations::get_schema_version(conn)).unwrap();
        assert_eq!(version, migrations::SCHEMA_VERSION);
    }

    #[test]
    fn test_reopen_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.db");

        Database::open_and_migrate(&path).unwrap();
        let database = Database::open_and_migrate(&path).unwrap();

        let count: i64 = database
            .with_conn(|conn| Ok(conn.query_row("SELECT COUNT(*) FROM saved_ingredients", [], |r| r.get(0))?))
            .unwrap();
        assert_eq!(count, 4);
    }
}
