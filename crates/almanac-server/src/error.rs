//! Error types for the server binary.
//!
//! [`AppError`] is the top-level error type that wraps all possible
//! failure modes during startup and serving.

/// Top-level error for the server binary.
///
/// Each variant wraps a specific subsystem error, providing a single
/// error type that `main` can propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: almanac_core::ConfigError,
    },

    /// Opening or querying the event store failed.
    #[error("database error: {source}")]
    Database {
        /// The underlying database error.
        #[from]
        source: almanac_db::DbError,
    },

    /// The store reported unusable year bounds.
    #[error("bounds error: {source}")]
    Bounds {
        /// The underlying bounds error.
        #[from]
        source: almanac_core::BoundsError,
    },

    /// The HTTP server failed to bind or serve.
    #[error("server error: {source}")]
    Server {
        /// The underlying server error.
        #[from]
        source: almanac_api::ServerError,
    },
}
