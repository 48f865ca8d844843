//! Database connection management
//!
//! Pooled SQLite access for the waste log and pantry.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{Connection, OpenFlags, Transaction, TransactionBehavior};
use thiserror::Error;

use super::migrations;

/// Database error types
#[derive(Debug, Error)]
pub enum DbError {
    #[error("Database connection error: {0}")]
    Connection(#[from] r2d2::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Cannot create database directory {path}: {source}")]
    Directory {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Result type for database operations
pub type DbResult<T> = Result<T, DbError>;

/// Pooled connection handed out by [`Database`]
pub type PooledConn = PooledConnection<SqliteConnectionManager>;

const POOL_SIZE: u32 = 8;

/// Applied to every new file-backed connection
const FILE_PRAGMAS: &str = "PRAGMA foreign_keys = ON;
     PRAGMA journal_mode = WAL;
     PRAGMA synchronous = NORMAL;
     PRAGMA busy_timeout = 5000;";

/// Database connection pool wrapper
#[derive(Clone)]
pub struct Database {
    pool: Arc<Pool<SqliteConnectionManager>>,
}

impl Database {
    /// Open (creating if needed) the database file and bring its schema up to date
    pub fn open<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| DbError::Directory {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let manager = SqliteConnectionManager::file(path)
            .with_flags(OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_CREATE)
            .with_init(|conn| conn.execute_batch(FILE_PRAGMAS));

        let pool = Pool::builder().max_size(POOL_SIZE).build(manager)?;
        let db = Self { pool: Arc::new(pool) };
        db.migrate()?;

        tracing::info!("Opened database at {}", path.display());
        Ok(db)
    }

    /// Migrated single-connection in-memory database
    pub fn in_memory() -> DbResult<Self> {
        let manager = SqliteConnectionManager::memory()
            .with_init(|conn| conn.execute_batch("PRAGMA foreign_keys = ON;"));

        // Every pooled memory connection is a separate database
        let pool = Pool::builder().max_size(1).build(manager)?;
        let db = Self { pool: Arc::new(pool) };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> DbResult<()> {
        self.with_conn(migrations::run_migrations)
    }

    /// Current schema version
    pub fn schema_version(&self) -> DbResult<i32> {
        self.with_conn(migrations::get_schema_version)
    }

    /// Get a connection from the pool
    pub fn get_conn(&self) -> DbResult<PooledConn> {
        Ok(self.pool.get()?)
    }

    /// Execute a closure with a database connection
    pub fn with_conn<F, T>(&self, f: F) -> DbResult<T>
    where
        F: FnOnce(&Connection) -> DbResult<T>,
    {
        let conn = self.get_conn()?;
        f(&conn)
    }

    /// Run a closure inside a transaction, committing only when it returns `Ok`
    ///
    /// The write lock is taken up front, so concurrent read-modify-write
    /// closures run one after another (bounded by `busy_timeout`).
    pub fn with_transaction<F, T>(&self, f: F) -> DbResult<T>
    where
        F: FnOnce(&Transaction<'_>) -> DbResult<T>,
    {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let value = f(&tx)?;
        tx.commit()?;
        Ok(value)
    }
}
