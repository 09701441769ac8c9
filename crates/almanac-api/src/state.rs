//! Shared application state for the API server.

use almanac_core::{EventSource, YearResolver};

/// Shared state for the Axum application.
///
/// Wrapped in [`Arc`](std::sync::Arc) and injected via Axum's `State`
/// extractor. Everything inside is immutable after startup.
#[derive(Debug)]
pub struct AppState<S> {
    /// Resolver over the event source, with bounds fixed at startup.
    pub resolver: YearResolver<S>,
}

impl<S: EventSource> AppState<S> {
    /// Create the application state.
    pub const fn new(resolver: YearResolver<S>) -> Self {
        Self { resolver }
    }
}
