/*!
 * Database connection management.
 *
 * This module handles SQLite database connection creation, initialization,
 * and provides async-safe access patterns using tokio's spawn_blocking.
 */

use anyhow::{Context, Result};
use log::{debug, info};
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::errors::StorageError;

use super::schema;

/// Default database filename
const DEFAULT_DB_FILENAME: &str = "doctran.db";

/// Default database directory name under user's data directory
const DEFAULT_DB_DIRNAME: &str = "doctran";

/// Database connection wrapper with thread-safe access
#[derive(Clone)]
pub struct StorageConnection {
    /// Path to the database file
    db_path: PathBuf,
    /// Thread-safe connection wrapped in Arc<Mutex>
    connection: Arc<Mutex<Connection>>,
}

impl StorageConnection {
    /// Create a new database connection at the default location
    pub fn new_default() -> Result<Self> {
        let db_path = Self::default_database_path()?;
        Self::new(&db_path)
    }

    /// Create a new database connection at the specified path
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let db_path = db_path.as_ref().to_path_buf();

        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create database directory: {:?}", parent))?;
        }

        info!("Opening database at: {:?}", db_path);

        let conn = Connection::open(&db_path)
            .with_context(|| format!("Failed to open database: {:?}", db_path))?;

        schema::initialize_schema(&conn)?;

        Ok(Self {
            db_path,
            connection: Arc::new(Mutex::new(conn)),
        })
    }

    /// Create an in-memory database (for testing)
    pub fn new_in_memory() -> Result<Self> {
        debug!("Creating in-memory database");

        let conn = Connection::open_in_memory().context("Failed to create in-memory database")?;

        schema::initialize_schema(&conn)?;

        Ok(Self {
            db_path: PathBuf::from(":memory:"),
            connection: Arc::new(Mutex::new(conn)),
        })
    }

    /// Get the default database path
    pub fn default_database_path() -> Result<PathBuf> {
        let base_dir = dirs::data_local_dir()
            .or_else(dirs::data_dir)
            .or_else(|| dirs::home_dir().map(|h| h.join(".local").join("share")))
            .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;

        Ok(base_dir.join(DEFAULT_DB_DIRNAME).join(DEFAULT_DB_FILENAME))
    }

    /// Get the database file path
    pub fn path(&self) -> &Path {
        &self.db_path
    }

    /// Execute a database operation with the connection.
    ///
    /// Acquires the mutex and runs the closure on the calling thread. For
    /// async contexts, use `execute_async`.
    pub fn execute<F, T>(&self, f: F) -> Result<T, StorageError>
    where
        F: FnOnce(&Connection) -> Result<T, StorageError>,
    {
        let conn = self
            .connection
            .lock()
            .map_err(|e| StorageError::Database(format!("Failed to acquire database lock: {}", e)))?;

        f(&conn)
    }

    /// Execute a database operation asynchronously using spawn_blocking.
    ///
    /// This is the preferred method for async contexts as it prevents
    /// blocking the async runtime.
    pub async fn execute_async<F, T>(&self, f: F) -> Result<T, StorageError>
    where
        F: FnOnce(&Connection) -> Result<T, StorageError> + Send + 'static,
        T: Send + 'static,
    {
        let conn = self.connection.clone();

        tokio::task::spawn_blocking(move || {
            let conn = conn.lock().map_err(|e| {
                StorageError::Database(format!("Failed to acquire database lock: {}", e))
            })?;

            f(&conn)
        })
        .await
        .map_err(|e| StorageError::Database(format!("Database task panicked: {}", e)))?
    }

    /// Begin an async transaction and execute operations within it
    pub async fn transaction_async<F, T>(&self, f: F) -> Result<T, StorageError>
    where
        F: FnOnce(&rusqlite::Transaction) -> Result<T, StorageError> + Send + 'static,
        T: Send + 'static,
    {
        let conn = self.connection.clone();

        tokio::task::spawn_blocking(move || {
            let mut conn = conn.lock().map_err(|e| {
                StorageError::Database(format!("Failed to acquire database lock: {}", e))
            })?;

            let tx = conn
                .transaction()
                .map_err(|e| StorageError::Database(e.to_string()))?;
            let result = f(&tx)?;
            tx.commit()
                .map_err(|e| StorageError::Database(e.to_string()))?;

            Ok(result)
        })
        .await
        .map_err(|e| StorageError::Database(format!("Database transaction task panicked: {}", e)))?
    }

    /// Get database statistics
    pub fn stats(&self) -> Result<StorageStats, StorageError> {
        self.execute(|conn| {
            let document_count: i64 = conn
                .query_row("SELECT COUNT(*) FROM documents", [], |row| row.get(0))
                .unwrap_or(0);

            let section_count: i64 = conn
                .query_row("SELECT COUNT(*) FROM sections", [], |row| row.get(0))
                .unwrap_or(0);

            let proposal_count: i64 = conn
                .query_row("SELECT COUNT(*) FROM proposals", [], |row| row.get(0))
                .unwrap_or(0);

            let translated_count: i64 = conn
                .query_row(
                    "SELECT COUNT(*) FROM documents WHERE translation_status = 'completed'",
                    [],
                    |row| row.get(0),
                )
                .unwrap_or(0);

            Ok(StorageStats {
                document_count,
                section_count,
                proposal_count,
                translated_count,
            })
        })
    }
}

/// Database statistics
#[derive(Debug, Clone)]
pub struct StorageStats {
    /// Number of documents
    pub document_count: i64,
    /// Number of extracted sections
    pub section_count: i64,
    /// Number of proposals
    pub proposal_count: i64,
    /// Number of documents with a completed translation
    pub translated_count: i64,
}

impl std::fmt::Display for StorageStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Documents: {}, Sections: {}, Proposals: {}, Translated: {}",
            self.document_count, self.section_count, self.proposal_count, self.translated_count
        )
    }
}
