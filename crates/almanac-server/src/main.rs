//! Almanac events service binary.
//!
//! Wires the configuration, the `SQLite` event store, the year resolver,
//! and the HTTP API together, then serves until `Ctrl-C` or `SIGTERM`.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `almanac-config.yaml` (or `ALMANAC_CONFIG`)
//! 2. Initialize structured logging (tracing)
//! 3. Open the `SQLite` pool (the database file must already exist)
//! 4. Compute `max_year` / `max_century` once
//! 5. Build the resolver and serve `GET /events`
//! 6. On shutdown, close the pool

mod error;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use almanac_api::{AppState, ServerConfig, shutdown_signal, start_server};
use almanac_core::config::LoggingSection;
use almanac_core::{AlmanacConfig, YearBounds, YearResolver};
use almanac_db::{Database, DatabaseConfig};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::error::AppError;

/// Application entry point.
///
/// # Errors
///
/// Returns an error if any startup step fails or the server stops with
/// an error.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration.
    let (config, config_path) = load_config()?;

    // 2. Initialize structured logging.
    init_logging(&config.logging);
    info!("almanac-server starting");
    match &config_path {
        Some(path) => info!(path = %path.display(), "Configuration loaded"),
        None => info!("Config file not found, using defaults"),
    }

    // 3. Open the event store.
    let db_config = DatabaseConfig::new(config.database.path.clone())
        .with_max_connections(config.database.max_connections)
        .with_connect_timeout(Duration::from_millis(config.database.connect_timeout_ms))
        .with_read_only(config.database.read_only);
    let db = Database::connect(&db_config).await.map_err(AppError::from)?;

    let result = serve(&config, &db).await;

    // 6. Close the pool whether or not serving succeeded.
    db.close().await;

    result?;
    info!("almanac-server stopped");
    Ok(())
}

/// Compute the bounds, build the resolver, and run the HTTP server.
async fn serve(config: &AlmanacConfig, db: &Database) -> Result<(), AppError> {
    // 4. Compute the year bounds once.
    let store = db.event_store();
    let max_year = store.require_max_year().await?;
    let bounds = YearBounds::from_max_year(max_year)?;
    info!(
        max_year = bounds.max_year(),
        max_century = bounds.max_century(),
        "Year bounds computed"
    );

    // 5. Build the resolver and serve.
    let resolver = YearResolver::new(store, bounds)
        .with_fields(config.resolver.event_fields())
        .with_policy(config.resolver.fallback_policy());
    if resolver.policy().max_attempts.is_none() {
        warn!("Century fallback is unbounded; a year suffix with no events never resolves");
    }
    info!(
        fields = ?resolver.fields(),
        max_attempts = ?resolver.policy().max_attempts,
        "Year resolver ready"
    );

    let server_config = ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
    };
    let state = Arc::new(AppState::new(resolver));
    start_server(&server_config, state, shutdown_signal()).await?;
    Ok(())
}

/// Load the configuration file if present, else defaults.
///
/// Returns the path actually read so it can be logged once tracing is up.
fn load_config() -> Result<(AlmanacConfig, Option<PathBuf>), AppError> {
    let path = AlmanacConfig::path_from_env();
    if path.exists() {
        let config = AlmanacConfig::from_file(&path)?;
        Ok((config, Some(path)))
    } else {
        Ok((AlmanacConfig::parse("")?, None))
    }
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over the configured level.
fn init_logging(logging: &LoggingSection) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

    if logging.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    }
}
