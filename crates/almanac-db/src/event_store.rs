//! Read-only queries on the `events` table.
//!
//! Rows are returned in insertion order (`rowid`), which is the order the
//! scraper found them on the source page.

use almanac_core::EventSource;
use almanac_types::{Event, EventFields};
use sqlx::SqlitePool;

use crate::error::DbError;

/// Operations on the `events` table.
#[derive(Debug, Clone)]
pub struct EventStore {
    pool: SqlitePool,
}

impl EventStore {
    /// Create a new event store bound to a connection pool.
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Highest year holding at least one event, or `None` when empty.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Sqlite`] if the query fails.
    pub async fn max_year(&self) -> Result<Option<i64>, DbError> {
        let max: Option<i64> = sqlx::query_scalar("SELECT MAX(year) FROM events")
            .fetch_one(&self.pool)
            .await?;
        Ok(max)
    }

    /// Like [`EventStore::max_year`], but an empty store is an error.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::EmptyStore`] when the table has no rows.
    pub async fn require_max_year(&self) -> Result<i64, DbError> {
        self.max_year().await?.ok_or(DbError::EmptyStore)
    }

    /// Query the events stored for `year`.
    ///
    /// With [`EventFields::TextAndLinks`] the `links` column is decoded from
    /// its JSON array form.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Sqlite`] if the query fails, or [`DbError::Links`]
    /// if a stored `links` value is not a JSON array of strings.
    pub async fn get_events_by_year(
        &self,
        year: i64,
        fields: EventFields,
    ) -> Result<Vec<Event>, DbError> {
        if !fields.includes_links() {
            let rows: Vec<(String,)> =
                sqlx::query_as("SELECT text FROM events WHERE year = ?1 ORDER BY rowid")
                    .bind(year)
                    .fetch_all(&self.pool)
                    .await?;
            return Ok(rows.into_iter().map(|(text,)| Event::new(text)).collect());
        }

        let rows = sqlx::query_as::<_, EventRow>(
            "SELECT text, links FROM events WHERE year = ?1 ORDER BY rowid",
        )
        .bind(year)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(|row| row.into_event(year)).collect()
    }
}

impl EventSource for EventStore {
    type Error = DbError;

    async fn events_for_year(
        &self,
        year: i64,
        fields: EventFields,
    ) -> Result<Vec<Event>, Self::Error> {
        self.get_events_by_year(year, fields).await
    }
}

/// A row from the `events` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct EventRow {
    /// Event description.
    pub text: String,
    /// JSON array of URL strings, if the scraper stored one.
    pub links: Option<String>,
}

impl EventRow {
    /// Decode the row into an [`Event`].
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Links`] if `links` is not a JSON array of strings.
    pub fn into_event(self, year: i64) -> Result<Event, DbError> {
        let event = Event::new(self.text);
        match self.links {
            Some(raw) => {
                let links: Vec<String> = serde_json::from_str(&raw)
                    .map_err(|source| DbError::Links { year, source })?;
                Ok(event.with_links(links))
            }
            None => Ok(event),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn links_array_decodes_to_same_length() {
        let row = EventRow {
            text: String::from("Apollo 11 lands on the Moon"),
            links: Some(String::from(
                r#"["https://en.wikipedia.org/wiki/Apollo_11","https://en.wikipedia.org/wiki/Moon","https://en.wikipedia.org/wiki/NASA"]"#,
            )),
        };
        let event = row.into_event(1969).unwrap();
        assert_eq!(event.links.map(|l| l.len()), Some(3));
    }

    #[test]
    fn empty_links_array() {
        let row = EventRow {
            text: String::from("x"),
            links: Some(String::from("[]")),
        };
        assert_eq!(row.into_event(1).unwrap().links, Some(Vec::new()));
    }

    #[test]
    fn null_links_is_absent() {
        let row = EventRow {
            text: String::from("x"),
            links: None,
        };
        assert_eq!(row.into_event(1).unwrap(), Event::new("x"));
    }

    #[test]
    fn malformed_links_is_an_error() {
        let row = EventRow {
            text: String::from("x"),
            links: Some(String::from("not json")),
        };
        assert!(matches!(
            row.into_event(1812),
            Err(DbError::Links { year: 1812, .. })
        ));
    }
}
