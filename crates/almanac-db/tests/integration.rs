//! Integration tests for the `almanac-db` data layer.
//!
//! Each test opens a private in-memory `SQLite` database, applies the
//! migrations, and seeds the `events` table the way the scraper does.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]

use almanac_core::{EventSource, RequestedYear, YearBounds, YearResolver};
use almanac_db::{Database, DatabaseConfig, DbError, EventStore};
use almanac_types::{Event, EventFields, YearMatch};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode};

// =============================================================================
// Helpers
// =============================================================================

async fn setup() -> Database {
    let db = Database::connect(&DatabaseConfig::in_memory())
        .await
        .expect("Failed to open in-memory SQLite");
    db.run_migrations().await.expect("Failed to run migrations");
    db
}

async fn insert(db: &Database, year: i64, text: &str, links: Option<&[&str]>) {
    let links = links.map(|l| serde_json::to_string(l).unwrap());
    sqlx::query("INSERT INTO events (year, text, fetched_at, links) VALUES (?1, ?2, datetime('now'), ?3)")
        .bind(year)
        .bind(text)
        .bind(links)
        .execute(db.pool())
        .await
        .expect("Failed to insert event");
}

// =============================================================================
// EventStore
// =============================================================================

#[tokio::test]
async fn max_year_of_empty_store_is_none() {
    let db = setup().await;
    let store = db.event_store();

    assert_eq!(store.max_year().await.unwrap(), None);
    assert!(matches!(
        store.require_max_year().await,
        Err(DbError::EmptyStore)
    ));
}

#[tokio::test]
async fn max_year_is_highest_stored_year() {
    let db = setup().await;
    insert(&db, 1869, "Suez Canal opens", None).await;
    insert(&db, 2023, "Something recent", None).await;
    insert(&db, 59, "Something ancient", None).await;

    assert_eq!(db.event_store().require_max_year().await.unwrap(), 2023);
}

#[tokio::test]
async fn events_for_year_keep_insertion_order() {
    let db = setup().await;
    insert(&db, 1959, "first", None).await;
    insert(&db, 1958, "other year", None).await;
    insert(&db, 1959, "second", None).await;

    let events = db
        .event_store()
        .get_events_by_year(1959, EventFields::TextOnly)
        .await
        .unwrap();
    assert_eq!(events, vec![Event::new("first"), Event::new("second")]);
}

#[tokio::test]
async fn unknown_year_is_empty() {
    let db = setup().await;
    insert(&db, 1959, "first", None).await;

    let events = db
        .event_store()
        .get_events_by_year(1000, EventFields::TextAndLinks)
        .await
        .unwrap();
    assert!(events.is_empty());
}

#[tokio::test]
async fn links_are_decoded_when_requested() {
    let db = setup().await;
    let links = [
        "https://en.wikipedia.org/wiki/Apollo_11",
        "https://en.wikipedia.org/wiki/Neil_Armstrong",
    ];
    insert(&db, 1969, "Moon landing", Some(links.as_slice())).await;

    let store = db.event_store();
    let with_links = store
        .get_events_by_year(1969, EventFields::TextAndLinks)
        .await
        .unwrap();
    assert_eq!(with_links.len(), 1);
    assert_eq!(
        with_links[0].links,
        Some(links.iter().map(|l| (*l).to_owned()).collect())
    );

    let text_only = store
        .get_events_by_year(1969, EventFields::TextOnly)
        .await
        .unwrap();
    assert_eq!(text_only, vec![Event::new("Moon landing")]);
}

#[tokio::test]
async fn malformed_links_surface_as_error() {
    let db = setup().await;
    sqlx::query("INSERT INTO events (year, text, links) VALUES (1812, 'x', 'not json')")
        .execute(db.pool())
        .await
        .unwrap();

    let result = db
        .event_store()
        .get_events_by_year(1812, EventFields::TextAndLinks)
        .await;
    assert!(matches!(result, Err(DbError::Links { year: 1812, .. })));
}

#[tokio::test]
async fn store_implements_event_source() {
    let db = setup().await;
    insert(&db, 1959, "x", None).await;

    let store: EventStore = db.event_store();
    let events = store
        .events_for_year(1959, EventFields::TextOnly)
        .await
        .unwrap();
    assert_eq!(events.len(), 1);
}

// =============================================================================
// Resolver over SQLite
// =============================================================================

#[tokio::test]
async fn resolver_exact_match_over_sqlite() {
    let db = setup().await;
    insert(&db, 1969, "Moon landing", Some(&["https://en.wikipedia.org/wiki/Apollo_11"][..])).await;
    let store = db.event_store();
    let bounds = YearBounds::from_max_year(store.require_max_year().await.unwrap()).unwrap();
    let resolver = YearResolver::new(store, bounds);

    let mut rng = SmallRng::seed_from_u64(42);
    let year = RequestedYear::new(1969).unwrap();
    let resolution = resolver.resolve_with_rng(year, &mut rng).await.unwrap();

    assert_eq!(resolution.year, 1969);
    assert_eq!(resolution.year_match, YearMatch::Full);
    assert_eq!(resolution.events[0].text, "Moon landing");
}

#[tokio::test]
async fn resolver_century_fallback_over_sqlite() {
    let db = setup().await;
    insert(&db, 1869, "Suez Canal opens", None).await;
    let store = db.event_store();
    let bounds = YearBounds::from_max_year(store.require_max_year().await.unwrap()).unwrap();
    assert_eq!(bounds.max_century(), 18);
    let resolver = YearResolver::new(store, bounds);

    let mut rng = SmallRng::seed_from_u64(42);
    let year = RequestedYear::new(1969).unwrap();
    let resolution = resolver.resolve_with_rng(year, &mut rng).await.unwrap();

    assert_eq!(resolution.year, 1869);
    assert_eq!(resolution.year_match, YearMatch::Last2);
}

#[tokio::test]
async fn closed_pool_rejects_queries() {
    let db = setup().await;
    let store = db.event_store();
    db.close().await;

    assert!(matches!(store.max_year().await, Err(DbError::Sqlite(_))));
}

// =============================================================================
// File-backed stores
// =============================================================================

#[tokio::test]
async fn read_only_connection_keeps_rollback_journal() {
    let path = std::env::temp_dir().join(format!(
        "almanac-read-only-{}.sqlite3",
        std::process::id()
    ));
    let _ = std::fs::remove_file(&path);

    let writer = SqlitePool::connect_with(
        SqliteConnectOptions::new()
            .filename(&path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Delete),
    )
    .await
    .expect("Failed to create database file");
    sqlx::query("CREATE TABLE events (year INTEGER, text TEXT, fetched_at TEXT, links TEXT)")
        .execute(&writer)
        .await
        .unwrap();
    sqlx::query("INSERT INTO events (year, text) VALUES (1859, 'Origin of Species')")
        .execute(&writer)
        .await
        .unwrap();
    writer.close().await;

    let db = Database::connect(&DatabaseConfig::new(&path).with_read_only(true))
        .await
        .expect("Read-only connection must not switch journal mode");
    let store = db.event_store();
    assert_eq!(store.require_max_year().await.unwrap(), 1859);
    let events = store
        .get_events_by_year(1859, EventFields::TextOnly)
        .await
        .unwrap();
    assert_eq!(events, vec![Event::new("Origin of Species")]);

    let mode: String = sqlx::query_scalar("PRAGMA journal_mode")
        .fetch_one(db.pool())
        .await
        .unwrap();
    assert_eq!(mode, "delete");

    db.close().await;
    std::fs::remove_file(&path).unwrap();
}
