//! Core domain library for RecipeBox (config, storage, validation, models).

/// Configuration loading and defaults.
pub mod config;
/// Shared constants used across RecipeBox crates.
pub mod constants;
/// Process-global environment mutation helpers.
pub mod env;
/// Application error types (storage/domain).
pub mod error;
/// Recipe records, filters and pagination windows.
pub mod models;
/// Repository abstraction and its file/SQLite stores.
pub mod repository;
/// Bulk import of recipe documents into an empty store.
pub mod seed;
/// Field-level validation of inbound recipe payloads.
pub mod validation;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::{Config, DataSource, DatabaseConfig};
pub use constants::{DEFAULT_CLI_SERVER_URL, DEFAULT_PORT};
pub use error::AppError;
pub use models::recipe::{Difficulty, NewRecipe, Pagination, Recipe, RecipeFilter, RecipePatch};
pub use repository::{
    FileRecipeStore, RecipeRepository, RecipeStore, SqliteOptions, SqliteRecipeStore,
    StoreSelector,
};
pub use validation::{FieldError, ValidationMode};
