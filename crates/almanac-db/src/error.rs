//! Error types for the data layer.
//!
//! All errors are propagated via [`DbError`] which wraps the underlying
//! [`sqlx`] and [`serde_json`] errors with additional context about which
//! operation failed.

/// Errors that can occur in the data layer.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// A `SQLite` operation failed.
    #[error("SQLite error: {0}")]
    Sqlite(#[from] sqlx::Error),

    /// A migration failed.
    #[error("SQLite migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A stored `links` value is not a JSON array of strings.
    #[error("invalid links JSON for year {year}: {source}")]
    Links {
        /// The year being read.
        year: i64,
        /// The underlying JSON error.
        source: serde_json::Error,
    },

    /// The `events` table holds no rows.
    #[error("event store is empty")]
    EmptyStore,

    /// A configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}
