//! Validation of the requested year.
//!
//! A valid year is a non-negative integer whose last two digits are at
//! most 59. Validation happens before any store lookup.

/// Highest accepted value for the last two digits of a year.
pub const MAX_LAST_TWO_DIGITS: i64 = 59;

/// Reasons a raw `year` parameter is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// No `year` parameter was supplied.
    #[error("missing year parameter")]
    Missing,

    /// The parameter is not an integer.
    #[error("year is not an integer: {raw:?}")]
    NotAnInteger {
        /// The raw parameter value.
        raw: String,
    },

    /// The year is below zero.
    #[error("year must not be negative: {year}")]
    Negative {
        /// The parsed year.
        year: i64,
    },

    /// The last two digits exceed [`MAX_LAST_TWO_DIGITS`].
    #[error("last two digits of year {year} are {last_two}, above {MAX_LAST_TWO_DIGITS}")]
    LastTwoDigitsOutOfRange {
        /// The parsed year.
        year: i64,
        /// `year % 100`.
        last_two: i64,
    },
}

impl ValidationError {
    /// The parsed year, when parsing got that far.
    pub const fn parsed_year(&self) -> Option<i64> {
        match self {
            Self::Missing | Self::NotAnInteger { .. } => None,
            Self::Negative { year } | Self::LastTwoDigitsOutOfRange { year, .. } => Some(*year),
        }
    }
}

/// A non-negative year handed to the resolver.
///
/// [`RequestedYear::new`] only rejects negative years. The endpoint
/// additionally caps the last two digits through [`RequestedYear::parse`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestedYear(i64);

impl RequestedYear {
    /// Wrap a non-negative year.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::Negative`] for years below zero.
    pub const fn new(year: i64) -> Result<Self, ValidationError> {
        if year < 0 {
            return Err(ValidationError::Negative { year });
        }
        Ok(Self(year))
    }

    /// Parse and validate the raw `year` query parameter.
    ///
    /// The whole (trimmed) string must be an integer; trailing garbage such
    /// as `1959abc` is rejected. The year must not be negative and its last
    /// two digits must not exceed [`MAX_LAST_TWO_DIGITS`].
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] describing the first failed check.
    pub fn parse(raw: Option<&str>) -> Result<Self, ValidationError> {
        let raw = raw.ok_or(ValidationError::Missing)?;
        let year: i64 = raw
            .trim()
            .parse()
            .map_err(|_parse_err| ValidationError::NotAnInteger {
                raw: raw.to_owned(),
            })?;
        let year = Self::new(year)?;
        let last_two = year.last_two_digits();
        if last_two > MAX_LAST_TWO_DIGITS {
            return Err(ValidationError::LastTwoDigitsOutOfRange {
                year: year.value(),
                last_two,
            });
        }
        Ok(year)
    }

    /// The year value.
    pub const fn value(self) -> i64 {
        self.0
    }

    /// `year % 100`.
    pub const fn last_two_digits(self) -> i64 {
        self.0.rem_euclid(100)
    }
}

impl core::fmt::Display for RequestedYear {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}
