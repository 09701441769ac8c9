//! Data layer for the Almanac events service (`SQLite`).
//!
//! The store is a single `events` table filled by the scraper. The service
//! only ever reads from it: the maximum year once at startup, then events
//! by year for every request.
//!
//! # Modules
//!
//! - [`sqlite`] -- `SQLite` connection pool and configuration
//! - [`event_store`] -- Year lookups and `links` decoding
//! - [`error`] -- Shared error types

pub mod error;
pub mod event_store;
pub mod sqlite;

// Re-export primary types for convenience.
pub use error::DbError;
pub use event_store::{EventRow, EventStore};
pub use sqlite::{Database, DatabaseConfig};
