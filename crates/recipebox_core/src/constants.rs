//! Shared constants used across RecipeBox crates.

/// Default API port for the recipe server.
pub const DEFAULT_PORT: u16 = 3001;

/// Default maximum request body accepted by the API layer.
pub const DEFAULT_MAX_BODY_SIZE: usize = 1024 * 1024;

/// Default location of the JSON document used by the file store.
pub const DEFAULT_JSON_DB_PATH: &str = "db.json";

/// Default SQLite database file for the relational store.
pub const DEFAULT_SQLITE_DATABASE: &str = "database.sqlite";

/// Default port carried for network database engines.
pub const DEFAULT_DB_PORT: u16 = 5432;

/// Default base URL for CLI/API clients.
pub const DEFAULT_CLI_SERVER_URL: &str = "http://localhost:3001";

/// Maximum title length in characters.
pub const TITLE_MAX_CHARS: usize = 100;
/// Maximum cuisine length in characters.
pub const CUISINE_MAX_CHARS: usize = 50;
/// Maximum description length in characters.
pub const DESCRIPTION_MAX_CHARS: usize = 1000;
/// Upper bound for cook time, in minutes (one day).
pub const COOK_TIME_MAX_MINUTES: u64 = 1440;
/// Upper bound for servings.
pub const SERVINGS_MAX: u64 = 50;
/// Upper bound for ratings; the lower bound is zero.
pub const RATING_MAX: f64 = 5.0;
