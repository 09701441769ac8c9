//! Historical events as stored in the `events` table.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// A single historical event that happened in some year.
///
/// Events are immutable and read-only. `links` carries the Wikipedia URLs
/// referenced by the event text, in the order they appear. It is absent
/// when the caller asked for [`EventFields::TextOnly`] or when the stored
/// row has no links column value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Event {
    /// The event description (may contain inline HTML from the source page).
    pub text: String,

    /// Ordered URLs referenced by the event.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub links: Option<Vec<String>>,
}

impl Event {
    /// Create an event with text only.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            links: None,
        }
    }

    /// Attach links to the event.
    #[must_use]
    pub fn with_links(mut self, links: Vec<String>) -> Self {
        self.links = Some(links);
        self
    }

    /// Drop fields that are not part of the requested projection.
    #[must_use]
    pub fn project(mut self, fields: EventFields) -> Self {
        if !fields.includes_links() {
            self.links = None;
        }
        self
    }
}

/// Which event columns a lookup should fetch and return.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventFields {
    /// Only the event text.
    TextOnly,
    /// Event text plus the decoded `links` array.
    #[default]
    TextAndLinks,
}

impl EventFields {
    /// Build the projection from an "include links" flag.
    pub const fn from_include_links(include_links: bool) -> Self {
        if include_links {
            Self::TextAndLinks
        } else {
            Self::TextOnly
        }
    }

    /// Whether the `links` column is part of this projection.
    pub const fn includes_links(self) -> bool {
        matches!(self, Self::TextAndLinks)
    }
}
