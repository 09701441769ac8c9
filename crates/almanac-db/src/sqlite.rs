//! `SQLite` connection pool.
//!
//! Uses [`sqlx`] with runtime query construction (not compile-time checked)
//! to avoid requiring a database at build time. All queries are
//! parameterized.

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;

use crate::error::DbError;
use crate::event_store::EventStore;

/// Default maximum number of connections in the pool.
const DEFAULT_MAX_CONNECTIONS: u32 = 4;

/// Default connection timeout in seconds.
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 5;

/// Default idle timeout in seconds.
const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 300;

/// Where the database lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseLocation {
    /// An existing file on disk.
    File(PathBuf),
    /// A private in-memory database (tests and tooling).
    Memory,
}

/// Configuration for the `SQLite` connection pool.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Database file or in-memory.
    pub location: DatabaseLocation,
    /// Maximum number of connections in the pool.
    pub max_connections: u32,
    /// Connection timeout.
    pub connect_timeout: Duration,
    /// Idle connection timeout. `None` keeps connections open.
    pub idle_timeout: Option<Duration>,
    /// Open connections with `SQLITE_OPEN_READONLY`.
    pub read_only: bool,
}

impl DatabaseConfig {
    /// Create a configuration for an existing database file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            location: DatabaseLocation::File(path.into()),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            idle_timeout: Some(Duration::from_secs(DEFAULT_IDLE_TIMEOUT_SECS)),
            read_only: false,
        }
    }

    /// Create a configuration for a fresh in-memory database.
    ///
    /// An in-memory database lives only as long as its connection, so the
    /// pool is pinned to a single connection that is never recycled.
    pub const fn in_memory() -> Self {
        Self {
            location: DatabaseLocation::Memory,
            max_connections: 1,
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            idle_timeout: None,
            read_only: false,
        }
    }

    /// Set the maximum number of connections.
    #[must_use]
    pub const fn with_max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// Set the connection timeout.
    #[must_use]
    pub const fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Open connections read-only.
    #[must_use]
    pub const fn with_read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    fn connect_options(&self) -> Result<SqliteConnectOptions, DbError> {
        match &self.location {
            DatabaseLocation::Memory => Ok(SqliteConnectOptions::from_str("sqlite::memory:")?),
            DatabaseLocation::File(path) => {
                ensure_exists(path)?;
                let options = SqliteConnectOptions::new()
                    .filename(path)
                    .create_if_missing(false)
                    .read_only(self.read_only);
                // Switching the journal mode is a write; read-only
                // connections keep whatever mode the file already has.
                if self.read_only {
                    Ok(options)
                } else {
                    Ok(options.journal_mode(SqliteJournalMode::Wal))
                }
            }
        }
    }
}

/// Connection pool handle to the `SQLite` event database.
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Connect using the provided configuration.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Config`] if the database file does not exist.
    /// Returns [`DbError::Sqlite`] if the connection fails.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, DbError> {
        let connect_options = config.connect_options()?;

        let mut pool_options = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.connect_timeout)
            .idle_timeout(config.idle_timeout);
        if config.location == DatabaseLocation::Memory {
            pool_options = pool_options.min_connections(1).max_lifetime(None::<Duration>);
        }

        let pool = pool_options.connect_with(connect_options).await?;

        tracing::info!(
            location = ?config.location,
            max_connections = config.max_connections,
            read_only = config.read_only,
            "Connected to SQLite"
        );

        Ok(Self { pool })
    }

    /// Run all pending migrations from the `migrations/` directory.
    ///
    /// The service never calls this on its own; it is for fresh databases
    /// and tests.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Migration`] if any migration fails.
    pub async fn run_migrations(&self) -> Result<(), DbError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        tracing::info!("Database migrations completed");
        Ok(())
    }

    /// Return a reference to the underlying [`SqlitePool`].
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Event lookups over this pool.
    pub fn event_store(&self) -> EventStore {
        EventStore::new(self.pool.clone())
    }

    /// Close all connections in the pool gracefully.
    pub async fn close(&self) {
        self.pool.close().await;
        tracing::info!("SQLite pool closed");
    }
}

/// The store is filled by the scraper; refuse to create an empty file.
fn ensure_exists(path: &Path) -> Result<(), DbError> {
    if path.is_file() {
        Ok(())
    } else {
        Err(DbError::Config(format!(
            "database file not found: {}",
            path.display()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_config_defaults() {
        let config = DatabaseConfig::new("db.sqlite3");
        assert_eq!(
            config.location,
            DatabaseLocation::File(PathBuf::from("db.sqlite3"))
        );
        assert_eq!(config.max_connections, DEFAULT_MAX_CONNECTIONS);
        assert!(!config.read_only);
    }

    #[test]
    fn builders() {
        let config = DatabaseConfig::new("db.sqlite3")
            .with_max_connections(2)
            .with_read_only(true)
            .with_connect_timeout(Duration::from_millis(250));
        assert_eq!(config.max_connections, 2);
        assert!(config.read_only);
        assert_eq!(config.connect_timeout, Duration::from_millis(250));
    }

    #[test]
    fn in_memory_is_single_connection() {
        let config = DatabaseConfig::in_memory();
        assert_eq!(config.max_connections, 1);
        assert!(config.idle_timeout.is_none());
    }

    #[tokio::test]
    async fn missing_file_is_a_config_error() {
        let config = DatabaseConfig::new("/nonexistent/almanac/db.sqlite3");
        let result = Database::connect(&config).await;
        assert!(matches!(result, Err(DbError::Config(_))));
    }
}
