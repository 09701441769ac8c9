//! Store-wide year bounds.
//!
//! `max_year` is read from the store once at startup and never changes
//! afterwards. The resolver samples centuries in `0..=max_century`.

/// Errors building [`YearBounds`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoundsError {
    /// The store reported a negative maximum year.
    #[error("maximum stored year is negative: {max_year}")]
    NegativeMaxYear {
        /// The reported maximum.
        max_year: i64,
    },
}

/// Immutable year bounds of the event store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearBounds {
    max_year: i64,
    max_century: i64,
}

impl YearBounds {
    /// Build bounds from the maximum year present in the store.
    ///
    /// # Errors
    ///
    /// Returns [`BoundsError::NegativeMaxYear`] if `max_year < 0`.
    pub const fn from_max_year(max_year: i64) -> Result<Self, BoundsError> {
        if max_year < 0 {
            return Err(BoundsError::NegativeMaxYear { max_year });
        }
        Ok(Self {
            max_year,
            max_century: max_year.div_euclid(100),
        })
    }

    /// Maximum year present in the store.
    pub const fn max_year(&self) -> i64 {
        self.max_year
    }

    /// `floor(max_year / 100)`.
    pub const fn max_century(&self) -> i64 {
        self.max_century
    }

    /// Whether the exact lookup is skipped for `year`.
    ///
    /// Year 0 and years after `max_year` go straight to the fallback.
    pub const fn is_out_of_range(&self, year: i64) -> bool {
        year == 0 || year > self.max_year
    }

    /// Year with the given century and last two digits.
    pub const fn candidate_year(century: i64, last_two: i64) -> i64 {
        century.saturating_mul(100).saturating_add(last_two)
    }
}
