//! REST endpoint handlers.
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/events?year=N` | Events for year `N`, or a same-suffix substitute |

use std::sync::Arc;

use almanac_core::{EventSource, RequestedYear};
use almanac_types::EventsResponse;
use axum::Json;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use tracing::info;

use crate::error::ApiError;
use crate::state::AppState;

/// Query parameters for the `GET /events` endpoint.
///
/// `year` is kept as a raw string so validation can report exactly what
/// the client sent.
#[derive(Debug, serde::Deserialize)]
pub struct EventsQuery {
    /// The requested year.
    pub year: Option<String>,
}

/// Return the events for the requested year.
///
/// # Query Parameters
///
/// - `year`: non-negative integer whose last two digits are at most 59
///
/// # Errors
///
/// - 400 when `year` is missing, not an integer, negative, or ends in 60-99
/// - 404 when a bounded fallback finds no year with events
/// - 500 when the event source fails
pub async fn get_events<S: EventSource + 'static>(
    State(state): State<Arc<AppState<S>>>,
    query: Result<Query<EventsQuery>, QueryRejection>,
) -> Result<Json<EventsResponse>, ApiError> {
    let Query(params) = query.map_err(|rejection| {
        info!(reason = %rejection.body_text(), "/events 400");
        ApiError::InvalidQuery(rejection.body_text())
    })?;

    let year = RequestedYear::parse(params.year.as_deref()).inspect_err(|e| {
        info!(
            year = ?params.year,
            parsed_year = ?e.parsed_year(),
            reason = %e,
            "/events 400"
        );
    })?;

    let resolution = state.resolver.resolve(year).await?;
    Ok(Json(resolution.into()))
}
