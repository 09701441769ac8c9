//! Core year-resolution logic for the Almanac events service.
//!
//! Given a requested year, the [`YearResolver`] looks for events in that
//! exact year. When the year is out of range or has no events, it keeps
//! the last two digits and substitutes random centuries until a year with
//! events is found.
//!
//! # Modules
//!
//! - [`year`] -- Validation of the raw `year` query parameter
//! - [`bounds`] -- Store-wide year bounds computed once at startup
//! - [`source`] -- The [`EventSource`] seam plus an in-memory implementation
//! - [`resolver`] -- Exact match and century fallback
//! - [`config`] -- YAML configuration with environment overrides

pub mod bounds;
pub mod config;
pub mod resolver;
pub mod source;
pub mod year;

// Re-export primary types for convenience.
pub use bounds::{BoundsError, YearBounds};
pub use config::{AlmanacConfig, ConfigError};
pub use resolver::{FallbackPolicy, Resolution, ResolveError, YearResolver};
pub use source::{EventSource, InMemorySource};
pub use year::{RequestedYear, ValidationError};
