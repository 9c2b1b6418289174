//! Configuration loading from environment variables.

use crate::constants::{
    DEFAULT_DB_PORT, DEFAULT_JSON_DB_PATH, DEFAULT_MAX_BODY_SIZE, DEFAULT_PORT,
    DEFAULT_SQLITE_DATABASE,
};
use std::env;
use std::fmt;
use std::path::PathBuf;

/// Which store backs the recipe repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
    /// Single JSON document on disk.
    Json,
    /// Relational SQLite database.
    Sqlite,
}

impl DataSource {
    /// Parse a `DATA_SOURCE` value.
    ///
    /// `typeorm` and `relational` are accepted as aliases for `sqlite`.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "json" | "file" => Some(Self::Json),
            "sqlite" | "typeorm" | "relational" => Some(Self::Sqlite),
            _ => None,
        }
    }

    /// Stable lowercase label used in logs and the health endpoint.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Sqlite => "sqlite",
        }
    }
}

/// Connection settings for the relational store.
///
/// Host, port and credentials are carried for network engines; the bundled
/// SQLite engine only uses `database`.
#[derive(Clone)]
pub struct DatabaseConfig {
    pub engine: String,
    pub host: Option<String>,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    pub database: String,
    pub synchronize: bool,
    pub logging: bool,
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("engine", &self.engine)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("database", &self.database)
            .field("synchronize", &self.synchronize)
            .field("logging", &self.logging)
            .finish()
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            engine: "sqlite".to_string(),
            host: None,
            port: DEFAULT_DB_PORT,
            username: None,
            password: None,
            database: DEFAULT_SQLITE_DATABASE.to_string(),
            synchronize: true,
            logging: false,
        }
    }
}

/// Runtime configuration for the recipe server.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub data_source: DataSource,
    pub json_db_path: String,
    pub database: DatabaseConfig,
    pub max_body_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            data_source: DataSource::Json,
            json_db_path: DEFAULT_JSON_DB_PATH.to_string(),
            database: DatabaseConfig::default(),
            max_body_size: DEFAULT_MAX_BODY_SIZE,
        }
    }
}

/// Expand tilde (~) in paths to the user's home directory
fn expand_tilde(path: String) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = resolve_home_dir() {
            return home.join(rest).to_string_lossy().to_string();
        }
    }
    path
}

fn resolve_home_dir() -> Option<PathBuf> {
    if let Ok(home) = env::var("HOME") {
        if !home.trim().is_empty() {
            return Some(PathBuf::from(home));
        }
    }

    // Windows
    if let Ok(profile) = env::var("USERPROFILE") {
        if !profile.trim().is_empty() {
            return Some(PathBuf::from(profile));
        }
    }

    None
}

/// Parse a boolean-like environment flag value.
///
/// # Supported Values
/// - Truthy: `1`, `true`, `yes`, `on`
/// - Falsy: `0`, `false`, `no`, `off`, empty string
///
/// Matching is case-insensitive and ignores surrounding whitespace.
///
/// # Returns
/// `Some(bool)` when the value is recognized, otherwise `None`.
pub fn parse_env_flag(value: &str) -> Option<bool> {
    let normalized = value.trim().to_ascii_lowercase();
    match normalized.as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "" | "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Read a boolean flag from the environment, falling back to `default`
/// when the variable is missing or unrecognized.
pub fn env_flag_or(name: &str, default: bool) -> bool {
    env::var(name)
        .ok()
        .and_then(|value| parse_env_flag(&value))
        .unwrap_or(default)
}

/// Read a boolean flag from the environment.
///
/// Missing or unrecognized values are treated as `false`.
pub fn env_flag_enabled(name: &str) -> bool {
    env_flag_or(name, false)
}

fn env_non_empty(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn env_parsed<T: std::str::FromStr>(name: &str) -> Option<T> {
    env_non_empty(name).and_then(|value| value.parse().ok())
}

impl DatabaseConfig {
    fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            engine: env_non_empty("DB_TYPE")
                .map(|engine| engine.to_ascii_lowercase())
                .unwrap_or(defaults.engine),
            host: env_non_empty("DB_HOST"),
            port: env_parsed("DB_PORT").unwrap_or(defaults.port),
            username: env_non_empty("DB_USERNAME"),
            password: env::var("DB_PASSWORD").ok(),
            database: env_non_empty("DB_DATABASE")
                .map(expand_tilde)
                .unwrap_or(defaults.database),
            synchronize: env_flag_or("DB_SYNCHRONIZE", defaults.synchronize),
            logging: env_flag_or("DB_LOGGING", defaults.logging),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Returns
    /// A populated [`Config`] with defaults applied when env vars are missing
    /// or unparseable.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let data_source = match env_non_empty("DATA_SOURCE") {
            Some(raw) => DataSource::parse(&raw).unwrap_or_else(|| {
                tracing::warn!("Unknown DATA_SOURCE='{}'; falling back to json", raw);
                DataSource::Json
            }),
            None => defaults.data_source,
        };
        Self {
            port: env_parsed("PORT").unwrap_or(defaults.port),
            data_source,
            json_db_path: env_non_empty("JSON_DB_PATH")
                .map(expand_tilde)
                .unwrap_or(defaults.json_db_path),
            database: DatabaseConfig::from_env(),
            max_body_size: env_parsed("MAX_BODY_SIZE").unwrap_or(defaults.max_body_size),
        }
    }
}
