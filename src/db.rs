//! Database Module
//!
//! Owns the single shared SQLite connection and the schema for both the HTTP
//! cache and the configuration store. A `Database` is constructed once by the
//! composition root and handed to every DAO.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};
use rusqlite::Connection;
use tracing::debug;

use crate::error::Result;

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS http_cache (
        url TEXT PRIMARY KEY NOT NULL,
        response_body TEXT NOT NULL,
        response_headers TEXT NOT NULL,
        creation_timestamp INTEGER NOT NULL,
        max_age_seconds INTEGER NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_http_cache_creation_timestamp
        ON http_cache (creation_timestamp);

    CREATE TABLE IF NOT EXISTS configurations (
        config_row_id INTEGER PRIMARY KEY NOT NULL,
        type INTEGER NOT NULL,
        version INTEGER NOT NULL,
        id TEXT NOT NULL,
        value BLOB NOT NULL
    );
    CREATE UNIQUE INDEX IF NOT EXISTS idx_configurations_type_version_id
        ON configurations (type, version, id);

    CREATE TABLE IF NOT EXISTS labels (
        config_row_id INTEGER NOT NULL,
        label TEXT NOT NULL,
        PRIMARY KEY (config_row_id, label),
        FOREIGN KEY (config_row_id)
            REFERENCES configurations (config_row_id) ON DELETE CASCADE
    );
";

// == Database ==
/// Shared handle to the storage engine.
///
/// Cloning is cheap; all clones serialize on the same connection.
#[derive(Clone)]
pub struct Database {
    connection: Arc<Mutex<Connection>>,
}

impl Database {
    /// Opens (creating if needed) a database file and ensures the schema exists.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        debug!("Opening database at {}", path.display());
        Self::from_connection(Connection::open(path)?)
    }

    /// Opens a private in-memory database, mostly for tests.
    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(connection: Connection) -> Result<Self> {
        // Label rows rely on the cascade; SQLite leaves FK enforcement off by default.
        connection.execute_batch("PRAGMA foreign_keys = ON;")?;
        connection.execute_batch(SCHEMA)?;
        Ok(Self {
            connection: Arc::new(Mutex::new(connection)),
        })
    }

    /// Locks the connection for the duration of one operation or transaction.
    pub(crate) fn lock(&self) -> MutexGuard<'_, Connection> {
        self.connection.lock()
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database").finish_non_exhaustive()
    }
}
