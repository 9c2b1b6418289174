//! Repository abstraction over the recipe collection.
//!
//! Two stores implement [`RecipeRepository`]: a single JSON document on disk
//! ([`FileRecipeStore`]) and a SQLite table ([`SqliteRecipeStore`]).
//! [`RecipeStore`] picks one at construction time and dispatches by variant.

/// JSON-document store.
pub mod file;
/// Lazily constructed, resettable store handle.
pub mod selector;
/// SQLite store.
pub mod sqlite;

#[cfg(test)]
mod tests;

pub use file::FileRecipeStore;
pub use selector::StoreSelector;
pub use sqlite::{SqliteOptions, SqliteRecipeStore};

use crate::config::{Config, DataSource};
use crate::error::AppError;
use crate::models::recipe::{NewRecipe, Pagination, Recipe, RecipeFilter, RecipePatch};

/// CRUD contract shared by every recipe store.
pub trait RecipeRepository: Send + Sync {
    /// List recipes matching `filter`, sliced to `pagination` when given.
    ///
    /// Without pagination the full filtered set is returned in store order
    /// (insertion order for the file store, id order for SQLite).
    fn find_all(
        &self,
        filter: &RecipeFilter,
        pagination: Option<Pagination>,
    ) -> Result<Vec<Recipe>, AppError>;

    /// Fetch one recipe; `Ok(None)` when the id is unknown.
    fn find_by_id(&self, id: i64) -> Result<Option<Recipe>, AppError>;

    /// Persist a new recipe and return it with its assigned id.
    fn create(&self, recipe: NewRecipe) -> Result<Recipe, AppError>;

    /// Merge `patch` over the stored recipe.
    ///
    /// # Returns
    /// `Ok(Some(recipe))` with the merged record, `Ok(None)` when missing.
    fn update(&self, id: i64, patch: RecipePatch) -> Result<Option<Recipe>, AppError>;

    /// Remove a recipe; `Ok(false)` when the id is unknown.
    fn delete(&self, id: i64) -> Result<bool, AppError>;

    /// Number of stored recipes.
    fn count(&self) -> Result<usize, AppError>;
}

/// The configured store.
pub enum RecipeStore {
    File(FileRecipeStore),
    Sqlite(SqliteRecipeStore),
}

impl RecipeStore {
    /// Open the store selected by `config.data_source`.
    ///
    /// # Errors
    /// Returns [`AppError::Config`] when the relational engine is not SQLite
    /// or the SQLite schema is missing with synchronization disabled, and
    /// storage errors when the database cannot be opened.
    pub fn open(config: &Config) -> Result<Self, AppError> {
        match config.data_source {
            DataSource::Json => {
                tracing::info!("Using JSON file store at {}", config.json_db_path);
                Ok(Self::File(FileRecipeStore::new(&config.json_db_path)))
            }
            DataSource::Sqlite => {
                let database = &config.database;
                if database.engine != "sqlite" {
                    return Err(AppError::Config(format!(
                        "DB_TYPE '{}' is not supported; only sqlite is available",
                        database.engine
                    )));
                }
                tracing::info!("Using SQLite store at {}", database.database);
                let options = SqliteOptions {
                    synchronize: database.synchronize,
                    log_queries: database.logging,
                };
                Ok(Self::Sqlite(SqliteRecipeStore::open(
                    &database.database,
                    options,
                )?))
            }
        }
    }

    /// Which backend this store uses.
    pub fn backend(&self) -> DataSource {
        match self {
            Self::File(_) => DataSource::Json,
            Self::Sqlite(_) => DataSource::Sqlite,
        }
    }
}

impl From<FileRecipeStore> for RecipeStore {
    fn from(value: FileRecipeStore) -> Self {
        Self::File(value)
    }
}

impl From<SqliteRecipeStore> for RecipeStore {
    fn from(value: SqliteRecipeStore) -> Self {
        Self::Sqlite(value)
    }
}

impl RecipeRepository for RecipeStore {
    fn find_all(
        &self,
        filter: &RecipeFilter,
        pagination: Option<Pagination>,
    ) -> Result<Vec<Recipe>, AppError> {
        match self {
            Self::File(store) => store.find_all(filter, pagination),
            Self::Sqlite(store) => store.find_all(filter, pagination),
        }
    }

    fn find_by_id(&self, id: i64) -> Result<Option<Recipe>, AppError> {
        match self {
            Self::File(store) => store.find_by_id(id),
            Self::Sqlite(store) => store.find_by_id(id),
        }
    }

    fn create(&self, recipe: NewRecipe) -> Result<Recipe, AppError> {
        match self {
            Self::File(store) => store.create(recipe),
            Self::Sqlite(store) => store.create(recipe),
        }
    }

    fn update(&self, id: i64, patch: RecipePatch) -> Result<Option<Recipe>, AppError> {
        match self {
            Self::File(store) => store.update(id, patch),
            Self::Sqlite(store) => store.update(id, patch),
        }
    }

    fn delete(&self, id: i64) -> Result<bool, AppError> {
        match self {
            Self::File(store) => store.delete(id),
            Self::Sqlite(store) => store.delete(id),
        }
    }

    fn count(&self) -> Result<usize, AppError> {
        match self {
            Self::File(store) => store.count(),
            Self::Sqlite(store) => store.count(),
        }
    }
}
