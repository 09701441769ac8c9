//! Response body for `GET /events`.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::event::Event;

/// How the matched year relates to the requested year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum YearMatch {
    /// Events were found for the exact requested year.
    #[serde(rename = "full")]
    Full,
    /// Events come from another century sharing the last two digits.
    #[serde(rename = "last2")]
    Last2,
}

impl YearMatch {
    /// The wire representation of the match kind.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Last2 => "last2",
        }
    }
}

impl core::fmt::Display for YearMatch {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// JSON body returned by `GET /events`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "camelCase")]
pub struct EventsResponse {
    /// The year the events belong to (may differ from the requested year).
    #[ts(type = "number")]
    pub year: i64,
    /// Whether `year` is the requested year or a last-two-digits substitute.
    pub year_match: YearMatch,
    /// The events, never empty on success.
    pub events: Vec<Event>,
}
