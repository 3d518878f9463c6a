//! Application settings.
//!
//! Settings are resolved once at startup from, in increasing precedence:
//! built-in defaults, an optional YAML document, `APP__*` environment
//! variables and the legacy single-name variables (`DATABASE_URL`, ...).
//! The resulting [`Config`] is passed down explicitly; nothing reads
//! process-wide state after startup.

use std::env;
use std::path::Path;

use serde::Deserialize;

use super::constants::{
    DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_DATABASE_URL, DEFAULT_LOG_LEVEL,
    DEFAULT_MAX_CONNECTIONS, DEFAULT_MIN_CONNECTIONS, DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT,
    ENV_PREFIX, ENV_SEPARATOR,
};
use crate::errors::{AppError, AppResult};

/// Application configuration
#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub database: DatabaseSettings,
    pub server: ServerSettings,
    pub log: LogSettings,
}

/// Database connection settings
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout_secs: u64,
    /// Log every SQL statement (very noisy)
    pub sqlx_logging: bool,
}

/// HTTP listener settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

/// Logging settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    pub level: String,
    pub format: LogFormat,
}

/// Output format of the fmt layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            url: DEFAULT_DATABASE_URL.to_string(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            min_connections: DEFAULT_MIN_CONNECTIONS,
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            sqlx_logging: false,
        }
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: DEFAULT_SERVER_HOST.to_string(),
            port: DEFAULT_SERVER_PORT,
        }
    }
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            format: LogFormat::default(),
        }
    }
}

// Don't expose the database URL (it carries credentials) in debug output
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("database", &self.database)
            .field("server", &self.server)
            .field("log", &self.log)
            .finish()
    }
}

impl std::fmt::Debug for DatabaseSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseSettings")
            .field("url", &"[REDACTED]")
            .field("max_connections", &self.max_connections)
            .field("min_connections", &self.min_connections)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .field("sqlx_logging", &self.sqlx_logging)
            .finish()
    }
}

impl Config {
    /// Load configuration from an optional YAML file and the environment.
    ///
    /// `.env` is read first (if present) so its values count as environment.
    ///
    /// # Errors
    /// Returns `AppError::Config` if the file cannot be read or parsed, or if
    /// a value has the wrong type.
    pub fn load(path: Option<&Path>) -> AppResult<Self> {
        dotenvy::dotenv().ok();

        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(
                config::File::from(path)
                    .format(config::FileFormat::Yaml)
                    .required(true),
            );
        }

        let mut settings: Self = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator(ENV_SEPARATOR)
                    .try_parsing(true),
            )
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|e| AppError::config(e.to_string()))?;

        settings.apply_legacy_env();
        settings.validate()?;
        Ok(settings)
    }

    /// Parse a YAML configuration document, e.g. one fetched from a config center.
    pub fn from_yaml_str(document: &str) -> AppResult<Self> {
        let settings: Self = config::Config::builder()
            .add_source(config::File::from_str(document, config::FileFormat::Yaml))
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|e| AppError::config(e.to_string()))?;

        settings.validate()?;
        Ok(settings)
    }

    /// Configuration pointing at the given database, everything else default.
    pub fn with_database_url(url: impl Into<String>) -> Self {
        let mut config = Self::default();
        config.database.url = url.into();
        config
    }

    /// Get the full server address.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Single-name variables kept for compatibility with existing deployments.
    fn apply_legacy_env(&mut self) {
        if let Ok(url) = env::var("DATABASE_URL") {
            self.database.url = url;
        }
        if let Ok(host) = env::var("SERVER_HOST") {
            self.server.host = host;
        }
        if let Some(port) = env::var("SERVER_PORT").ok().and_then(|v| v.parse().ok()) {
            self.server.port = port;
        }
        if let Ok(level) = env::var("LOG_LEVEL") {
            self.log.level = level;
        }
    }

    fn validate(&self) -> AppResult<()> {
        if self.database.url.trim().is_empty() {
            return Err(AppError::config("database.url must be set"));
        }
        if self.database.max_connections == 0 {
            return Err(AppError::config("database.max_connections must be at least 1"));
        }
        if self.database.min_connections > self.database.max_connections {
            return Err(AppError::config(
                "database.min_connections cannot exceed database.max_connections",
            ));
        }
        Ok(())
    }
}
