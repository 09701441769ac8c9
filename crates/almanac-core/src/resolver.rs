//! Year resolution: exact match first, last-two-digits fallback second.
//!
//! 1. Year 0 and years above `max_year` skip the exact lookup.
//! 2. Otherwise the requested year is looked up; a non-empty result is a
//!    [`YearMatch::Full`] match.
//! 3. The fallback picks a uniformly random century in `0..=max_century`,
//!    keeps the requested last two digits, and looks the candidate up.
//!    Centuries are not deduplicated, so the same century may be drawn
//!    again. The first non-empty result is a [`YearMatch::Last2`] match.
//!
//! The fallback is bounded by [`FallbackPolicy`]. An unbounded policy
//! retries forever when no century holds events for the requested suffix.

use std::num::NonZeroU32;

use almanac_types::{Event, EventFields, EventsResponse, YearMatch};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, warn};

use crate::bounds::YearBounds;
use crate::source::EventSource;
use crate::year::RequestedYear;

/// Default cap on fallback lookups per request.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 10_000;

/// Errors that can occur while resolving a year.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// The bounded fallback ran out of attempts.
    #[error("no events found for year {requested} after {attempts} fallback attempts")]
    NoMatch {
        /// The requested year.
        requested: i64,
        /// Number of fallback lookups made.
        attempts: u32,
    },

    /// The event source failed.
    #[error("event source error")]
    Source(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// How long the century fallback keeps trying.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FallbackPolicy {
    /// Maximum fallback lookups, or `None` to retry until a match is found.
    pub max_attempts: Option<NonZeroU32>,
}

impl FallbackPolicy {
    /// Retry until a match is found.
    pub const fn unbounded() -> Self {
        Self { max_attempts: None }
    }

    /// Give up after `max_attempts` fallback lookups.
    pub const fn bounded(max_attempts: NonZeroU32) -> Self {
        Self {
            max_attempts: Some(max_attempts),
        }
    }

    /// Build a policy from a configured attempt count.
    ///
    /// `None` and `Some(0)` both mean unbounded.
    pub const fn from_config(max_attempts: Option<u32>) -> Self {
        match max_attempts {
            Some(n) => Self {
                max_attempts: NonZeroU32::new(n),
            },
            None => Self::unbounded(),
        }
    }

    const fn exhausted(self, attempts: u32) -> bool {
        match self.max_attempts {
            Some(max) => attempts >= max.get(),
            None => false,
        }
    }
}

impl Default for FallbackPolicy {
    fn default() -> Self {
        Self::from_config(Some(DEFAULT_MAX_ATTEMPTS))
    }
}

/// The outcome of a successful resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// The year the events belong to.
    pub year: i64,
    /// Whether `year` is the requested year.
    pub year_match: YearMatch,
    /// Non-empty event list.
    pub events: Vec<Event>,
}

impl From<Resolution> for EventsResponse {
    fn from(resolution: Resolution) -> Self {
        Self {
            year: resolution.year,
            year_match: resolution.year_match,
            events: resolution.events,
        }
    }
}

/// Maps a requested year to a year with events.
///
/// Holds the event source, the immutable store bounds, the field
/// projection and the fallback policy. Construct once at startup and share.
#[derive(Debug)]
pub struct YearResolver<S> {
    source: S,
    bounds: YearBounds,
    fields: EventFields,
    policy: FallbackPolicy,
}

impl<S: EventSource> YearResolver<S> {
    /// Create a resolver with the default projection and fallback policy.
    pub fn new(source: S, bounds: YearBounds) -> Self {
        Self {
            source,
            bounds,
            fields: EventFields::default(),
            policy: FallbackPolicy::default(),
        }
    }

    /// Set the event field projection.
    #[must_use]
    pub fn with_fields(mut self, fields: EventFields) -> Self {
        self.fields = fields;
        self
    }

    /// Set the fallback policy.
    #[must_use]
    pub fn with_policy(mut self, policy: FallbackPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// The underlying event source.
    pub const fn source(&self) -> &S {
        &self.source
    }

    /// The store bounds.
    pub const fn bounds(&self) -> YearBounds {
        self.bounds
    }

    /// The configured projection.
    pub const fn fields(&self) -> EventFields {
        self.fields
    }

    /// The configured fallback policy.
    pub const fn policy(&self) -> FallbackPolicy {
        self.policy
    }

    /// Resolve `year` using a freshly seeded random generator.
    ///
    /// # Errors
    ///
    /// See [`YearResolver::resolve_with_rng`].
    pub async fn resolve(&self, year: RequestedYear) -> Result<Resolution, ResolveError> {
        let mut rng = SmallRng::from_rng(&mut rand::rng());
        self.resolve_with_rng(year, &mut rng).await
    }

    /// Resolve `year`, drawing fallback centuries from `rng`.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::NoMatch`] if a bounded fallback is exhausted,
    /// or [`ResolveError::Source`] if a lookup fails.
    pub async fn resolve_with_rng<R: Rng + Send>(
        &self,
        year: RequestedYear,
        rng: &mut R,
    ) -> Result<Resolution, ResolveError> {
        let requested = year.value();

        if self.bounds.is_out_of_range(requested) {
            debug!(
                year = requested,
                max_year = self.bounds.max_year(),
                "Year out of range, skipping exact lookup"
            );
        } else {
            let events = self.lookup(requested).await?;
            if !events.is_empty() {
                return Ok(Resolution {
                    year: requested,
                    year_match: YearMatch::Full,
                    events,
                });
            }
        }

        let last_two = year.last_two_digits();
        let max_century = self.bounds.max_century();
        let mut attempts: u32 = 0;

        loop {
            if self.policy.exhausted(attempts) {
                warn!(year = requested, attempts, "Century fallback exhausted");
                return Err(ResolveError::NoMatch {
                    requested,
                    attempts,
                });
            }

            let century = rng.random_range(0..=max_century);
            let candidate = YearBounds::candidate_year(century, last_two);
            attempts = attempts.saturating_add(1);

            let events = self.lookup(candidate).await?;
            if !events.is_empty() {
                debug!(
                    year = requested,
                    matched_year = candidate,
                    attempts,
                    "Resolved by century fallback"
                );
                return Ok(Resolution {
                    year: candidate,
                    year_match: YearMatch::Last2,
                    events,
                });
            }
        }
    }

    async fn lookup(&self, year: i64) -> Result<Vec<Event>, ResolveError> {
        self.source
            .events_for_year(year, self.fields)
            .await
            .map_err(|e| ResolveError::Source(Box::new(e)))
    }
}
