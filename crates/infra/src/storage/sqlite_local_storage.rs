//! SQLite-backed local storage.

use std::path::{Path, PathBuf};
use std::time::Duration;

use lago_core::LocalStorage;
use lago_domain::{LagoError, Result};
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{params, OptionalExtension};
use tracing::{debug, info};

use crate::errors::InfraError;

const SCHEMA_VERSION: i32 = 1;
const SCHEMA_SQL: &str = include_str!("schema.sql");
const DEFAULT_POOL_SIZE: u32 = 4;
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

type Connection = PooledConnection<SqliteConnectionManager>;

/// Key/value store persisted in a single SQLite table.
pub struct SqliteLocalStorage {
    pool: Pool<SqliteConnectionManager>,
    path: PathBuf,
}

impl SqliteLocalStorage {
    /// Open (or create) the storage file and ensure the schema exists.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::with_pool_size(path, DEFAULT_POOL_SIZE)
    }

    pub fn with_pool_size<P: AsRef<Path>>(path: P, pool_size: u32) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let manager =
            SqliteConnectionManager::file(&path).with_init(|conn| conn.busy_timeout(BUSY_TIMEOUT));
        let pool = Pool::builder().max_size(pool_size.max(1)).build(manager).map_err(map_pool_error)?;

        let storage = Self { pool, path };
        storage.run_migrations()?;

        info!(path = %storage.path.display(), max_connections = pool_size.max(1), "local storage initialised");
        Ok(storage)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Ensure the schema exists on the current file.
    pub fn run_migrations(&self) -> Result<()> {
        let conn = self.connection()?;
        conn.execute_batch(SCHEMA_SQL).map_err(map_sql_error)?;
        conn.execute(
            "INSERT OR IGNORE INTO schema_version (version, applied_at) VALUES (?, CAST(strftime('%s','now') AS INTEGER))",
            params![SCHEMA_VERSION],
        )
        .map_err(map_sql_error)?;
        Ok(())
    }

    /// Every stored key, sorted.
    pub fn keys(&self) -> Result<Vec<String>> {
        let conn = self.connection()?;
        let mut stmt =
            conn.prepare("SELECT key FROM local_storage ORDER BY key").map_err(map_sql_error)?;
        let keys = stmt
            .query_map([], |row| row.get(0))
            .map_err(map_sql_error)?
            .collect::<std::result::Result<Vec<String>, _>>()
            .map_err(map_sql_error)?;
        Ok(keys)
    }

    fn connection(&self) -> Result<Connection> {
        self.pool.get().map_err(map_pool_error)
    }
}

impl LocalStorage for SqliteLocalStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let conn = self.connection()?;
        conn.query_row("SELECT value FROM local_storage WHERE key = ?1", params![key], |row| {
            row.get(0)
        })
        .optional()
        .map_err(map_sql_error)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let conn = self.connection()?;
        conn.execute(
            "INSERT INTO local_storage (key, value, updated_at)
             VALUES (?1, ?2, CAST(strftime('%s','now') AS INTEGER))
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, value],
        )
        .map_err(map_sql_error)?;
        debug!(key, bytes = value.len(), "local storage item written");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let conn = self.connection()?;
        conn.execute("DELETE FROM local_storage WHERE key = ?1", params![key])
            .map_err(map_sql_error)?;
        Ok(())
    }
}

fn map_sql_error(err: rusqlite::Error) -> LagoError {
    LagoError::from(InfraError::from(err))
}

fn map_pool_error(err: r2d2::Error) -> LagoError {
    LagoError::from(InfraError::from(err))
}
