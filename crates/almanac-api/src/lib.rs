//! HTTP API for the Almanac events service.
//!
//! A single endpoint, `GET /events?year=<int>`, returns historical events
//! for the requested year. When the year has no events, the resolver
//! substitutes another century with the same last two digits and the
//! response says so via `yearMatch: "last2"`.
//!
//! # Architecture
//!
//! Handlers share an immutable [`AppState`] holding the
//! [`YearResolver`](almanac_core::YearResolver). The resolver owns the
//! event source and the store bounds computed at startup, so requests
//! never contend on anything but the connection pool.
//!
//! CORS is open to every origin. Errors map to JSON bodies; internal
//! failures and handler panics are logged and downgraded to a generic 500.

pub mod error;
pub mod handlers;
pub mod router;
pub mod server;
pub mod state;

// Re-export primary types for convenience.
pub use error::ApiError;
pub use router::build_router;
pub use server::{ServerConfig, ServerError, shutdown_signal, start_server};
pub use state::AppState;
