//! Configuration loading and typed config structures for the Almanac service.
//!
//! The configuration lives in `almanac-config.yaml` (or the file named by
//! `ALMANAC_CONFIG`). Every section is optional and falls back to defaults
//! that match a local development setup: `db.sqlite3` in the working
//! directory and port 8000.

use std::path::{Path, PathBuf};

use almanac_types::EventFields;
use serde::Deserialize;

use crate::resolver::{DEFAULT_MAX_ATTEMPTS, FallbackPolicy};

/// Default config file name, relative to the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "almanac-config.yaml";

/// Environment variable naming an alternative config file.
pub const CONFIG_PATH_ENV: &str = "ALMANAC_CONFIG";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// An environment override held an unusable value.
    #[error("invalid environment override {name}: {message}")]
    Env {
        /// The variable name.
        name: &'static str,
        /// What was wrong with it.
        message: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level service configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AlmanacConfig {
    /// HTTP listener settings.
    #[serde(default)]
    pub server: ServerSection,

    /// Event store settings.
    #[serde(default)]
    pub database: DatabaseSection,

    /// Year resolution settings.
    #[serde(default)]
    pub resolver: ResolverSection,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingSection,
}

impl AlmanacConfig {
    /// Load configuration from a YAML file, then apply env overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::Env`] if an override cannot be parsed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string, then apply env overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yml::from_str(yaml)?
        };
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// The config file to load: `ALMANAC_CONFIG` if set, else
    /// [`DEFAULT_CONFIG_FILE`].
    pub fn path_from_env() -> PathBuf {
        std::env::var(CONFIG_PATH_ENV)
            .map_or_else(|_| PathBuf::from(DEFAULT_CONFIG_FILE), PathBuf::from)
    }

    /// Apply environment variable overrides.
    ///
    /// - `HOST` overrides `server.host`
    /// - `PORT` overrides `server.port`
    /// - `DATABASE_PATH` overrides `database.path`
    /// - `LOG_LEVEL` overrides `logging.level`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Env`] if `PORT` is not a valid port number.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Ok(val) = std::env::var("HOST") {
            self.server.host = val;
        }
        if let Ok(val) = std::env::var("PORT") {
            self.server.port = val.parse().map_err(|e| ConfigError::Env {
                name: "PORT",
                message: format!("{val:?}: {e}"),
            })?;
        }
        if let Ok(val) = std::env::var("DATABASE_PATH") {
            self.database.path = PathBuf::from(val);
        }
        if let Ok(val) = std::env::var("LOG_LEVEL") {
            self.logging.level = val;
        }
        Ok(())
    }
}

/// HTTP listener configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerSection {
    /// Bind address.
    #[serde(default = "default_host")]
    pub host: String,

    /// TCP port.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Event store configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DatabaseSection {
    /// Path to the `SQLite` file. The file must already exist.
    #[serde(default = "default_database_path")]
    pub path: PathBuf,

    /// Maximum pooled connections.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Open connections read-only.
    #[serde(default)]
    pub read_only: bool,

    /// Pool acquire timeout in milliseconds.
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
}

impl Default for DatabaseSection {
    fn default() -> Self {
        Self {
            path: default_database_path(),
            max_connections: default_max_connections(),
            read_only: false,
            connect_timeout_ms: default_connect_timeout_ms(),
        }
    }
}

/// Year resolution configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ResolverSection {
    /// Return the `links` array with each event.
    #[serde(default = "default_include_links")]
    pub include_links: bool,

    /// Cap on century fallback lookups per request. `null` or `0` retries
    /// until a match is found.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: Option<u32>,
}

impl ResolverSection {
    /// The event projection selected by `include_links`.
    pub const fn event_fields(&self) -> EventFields {
        EventFields::from_include_links(self.include_links)
    }

    /// The fallback policy selected by `max_attempts`.
    pub const fn fallback_policy(&self) -> FallbackPolicy {
        FallbackPolicy::from_config(self.max_attempts)
    }
}

impl Default for ResolverSection {
    fn default() -> Self {
        Self {
            include_links: default_include_links(),
            max_attempts: default_max_attempts(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingSection {
    /// Default filter directive when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

fn default_host() -> String {
    String::from("0.0.0.0")
}

const fn default_port() -> u16 {
    8000
}

fn default_database_path() -> PathBuf {
    PathBuf::from("db.sqlite3")
}

const fn default_max_connections() -> u32 {
    4
}

const fn default_connect_timeout_ms() -> u64 {
    5000
}

const fn default_include_links() -> bool {
    true
}

#[allow(clippy::unnecessary_wraps)]
const fn default_max_attempts() -> Option<u32> {
    Some(DEFAULT_MAX_ATTEMPTS)
}

fn default_log_level() -> String {
    String::from("info")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = AlmanacConfig::default();
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.database.path, PathBuf::from("db.sqlite3"));
        assert!(config.resolver.include_links);
        assert_eq!(config.resolver.max_attempts, Some(DEFAULT_MAX_ATTEMPTS));
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn parse_full_yaml() {
        let yaml = r#"
server:
  host: "127.0.0.1"
  port: 9090
database:
  path: "/var/lib/almanac/events.sqlite3"
  max_connections: 8
  read_only: true
  connect_timeout_ms: 1000
resolver:
  include_links: false
  max_attempts: 50
logging:
  level: "debug"
  json: true
"#;
        let config: AlmanacConfig = serde_yml::from_str(yaml).unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 9090);
        assert_eq!(
            config.database.path,
            PathBuf::from("/var/lib/almanac/events.sqlite3")
        );
        assert_eq!(config.database.max_connections, 8);
        assert!(config.database.read_only);
        assert_eq!(config.resolver.event_fields(), EventFields::TextOnly);
        assert_eq!(
            config.resolver.fallback_policy(),
            FallbackPolicy::from_config(Some(50))
        );
        assert!(config.logging.json);
    }

    #[test]
    fn parse_minimal_yaml() {
        let config: AlmanacConfig = serde_yml::from_str("server:\n  port: 7000\n").unwrap();
        assert_eq!(config.server.port, 7000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.resolver, ResolverSection::default());
    }

    #[test]
    fn null_max_attempts_is_unbounded() {
        let config: AlmanacConfig =
            serde_yml::from_str("resolver:\n  max_attempts: null\n").unwrap();
        assert_eq!(config.resolver.max_attempts, None);
        assert_eq!(config.resolver.fallback_policy(), FallbackPolicy::unbounded());
    }

    #[test]
    fn parse_empty_yaml() {
        assert!(AlmanacConfig::parse("").is_ok());
    }

    #[test]
    fn invalid_yaml_is_an_error() {
        let result = AlmanacConfig::parse("server: [unclosed");
        assert!(matches!(result, Err(ConfigError::Yaml { .. })));
    }

    #[test]
    fn load_project_config_file() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join(DEFAULT_CONFIG_FILE);
        if path.exists() {
            let config = AlmanacConfig::from_file(&path);
            assert!(config.is_ok(), "Failed to load project config: {config:?}");
        }
    }
}
