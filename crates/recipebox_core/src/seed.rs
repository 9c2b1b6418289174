//! Bulk import of a `{ "recipes": [...] }` document into an empty store.

use crate::error::AppError;
use crate::models::recipe::NewRecipe;
use crate::repository::RecipeRepository;
use crate::validation::{validate_create, FieldError};
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;

#[derive(Deserialize)]
struct SeedDocument {
    #[serde(default)]
    recipes: Vec<Value>,
}

/// Result of [`seed_if_empty`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    /// The store already held records; nothing was written.
    Skipped { existing: usize },
    /// Every record was inserted.
    Seeded { inserted: usize },
}

/// Parse and validate a seed document.
///
/// Ids in the document are ignored; the target store assigns its own.
///
/// # Errors
/// Returns [`AppError::Validation`] naming every bad entry as
/// `recipes[<index>].<field>`, or a serialization error for malformed JSON.
pub fn parse_seed_document(raw: &str) -> Result<Vec<NewRecipe>, AppError> {
    let document: SeedDocument = serde_json::from_str(raw)?;
    let mut recipes = Vec::with_capacity(document.recipes.len());
    let mut errors = Vec::new();
    for (index, entry) in document.recipes.iter().enumerate() {
        match validate_create(entry) {
            Ok(recipe) => recipes.push(recipe),
            Err(AppError::Validation(details)) => {
                errors.extend(details.into_iter().map(|detail| {
                    FieldError::new(format!("recipes[{}].{}", index, detail.field), detail.message)
                }));
            }
            Err(other) => return Err(other),
        }
    }
    if errors.is_empty() {
        Ok(recipes)
    } else {
        Err(AppError::Validation(errors))
    }
}

/// Read and validate the seed document at `path`.
pub fn load_seed_file(path: impl AsRef<Path>) -> Result<Vec<NewRecipe>, AppError> {
    let raw = std::fs::read_to_string(path)?;
    parse_seed_document(&raw)
}

/// Insert `recipes` in order, but only when the store is empty.
pub fn seed_if_empty<R>(store: &R, recipes: Vec<NewRecipe>) -> Result<SeedOutcome, AppError>
where
    R: RecipeRepository + ?Sized,
{
    let existing = store.count()?;
    if existing > 0 {
        tracing::info!("Store already holds {} recipes; skipping seed", existing);
        return Ok(SeedOutcome::Skipped { existing });
    }
    let inserted = recipes.len();
    for recipe in recipes {
        store.create(recipe)?;
    }
    tracing::info!("Seeded {} recipes", inserted);
    Ok(SeedOutcome::Seeded { inserted })
}
