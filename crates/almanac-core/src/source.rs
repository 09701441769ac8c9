//! Event source abstraction.
//!
//! The resolver only needs "events for a year". [`EventSource`] abstracts
//! the mechanism: the `SQLite` store in production, or the
//! [`InMemorySource`] in tests.

use std::collections::BTreeMap;
use std::convert::Infallible;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};

use almanac_types::{Event, EventFields};

/// A read-only source of events keyed by year.
pub trait EventSource: Send + Sync {
    /// Error raised by a failed lookup.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Fetch all events stored for `year`, projected to `fields`.
    ///
    /// Returns an empty vector when the year has no events.
    ///
    /// # Errors
    ///
    /// Returns [`Self::Error`] if the underlying store fails.
    fn events_for_year(
        &self,
        year: i64,
        fields: EventFields,
    ) -> impl Future<Output = Result<Vec<Event>, Self::Error>> + Send;
}

/// An in-memory event source.
///
/// Counts lookups per year so tests can assert which years were queried.
#[derive(Debug, Default)]
pub struct InMemorySource {
    events: BTreeMap<i64, Vec<Event>>,
    lookups: BTreeMap<i64, AtomicUsize>,
    total_lookups: AtomicUsize,
}

impl InMemorySource {
    /// Create an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an event for `year`.
    #[must_use]
    pub fn with_event(mut self, year: i64, event: Event) -> Self {
        self.events.entry(year).or_default().push(event);
        self.lookups.entry(year).or_default();
        self
    }

    /// The highest year holding at least one event.
    pub fn max_year(&self) -> Option<i64> {
        self.events.keys().next_back().copied()
    }

    /// Number of lookups made for a year that holds events.
    pub fn lookups_for(&self, year: i64) -> usize {
        self.lookups
            .get(&year)
            .map_or(0, |count| count.load(Ordering::Relaxed))
    }

    /// Number of lookups made for any year.
    pub fn total_lookups(&self) -> usize {
        self.total_lookups.load(Ordering::Relaxed)
    }
}

impl EventSource for InMemorySource {
    type Error = Infallible;

    async fn events_for_year(
        &self,
        year: i64,
        fields: EventFields,
    ) -> Result<Vec<Event>, Self::Error> {
        self.total_lookups.fetch_add(1, Ordering::Relaxed);
        if let Some(count) = self.lookups.get(&year) {
            count.fetch_add(1, Ordering::Relaxed);
        }
        Ok(self
            .events
            .get(&year)
            .map(|events| {
                events
                    .iter()
                    .cloned()
                    .map(|event| event.project(fields))
                    .collect()
            })
            .unwrap_or_default())
    }
}
