//! Recipe storage in a single JSON document.
//!
//! Every call re-reads the whole document; every mutation rewrites it. The
//! rewrite goes through a temporary sibling file that is renamed over the
//! target, so readers see either the old or the new document.

use super::RecipeRepository;
use crate::error::AppError;
use crate::models::recipe::{NewRecipe, Pagination, Recipe, RecipeFilter, RecipePatch};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

/// On-disk document shape: `{ "recipes": [...] }`.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RecipeDocument {
    #[serde(default)]
    recipes: Vec<Recipe>,
    /// High-water mark so deleted ids are never handed out again.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    next_id: Option<i64>,
}

impl RecipeDocument {
    fn allocate_id(&mut self) -> Result<i64, AppError> {
        let exhausted = || AppError::StorageMessage("Recipe id space exhausted".to_string());
        let max_id = self.recipes.iter().map(|r| r.id).max().unwrap_or(0).max(0);
        let after_max = max_id.checked_add(1).ok_or_else(exhausted)?;
        let id = self.next_id.map_or(after_max, |next| next.max(after_max));
        self.next_id = Some(id.checked_add(1).ok_or_else(exhausted)?);
        Ok(id)
    }

    fn position(&self, id: i64) -> Option<usize> {
        self.recipes.iter().position(|r| r.id == id)
    }
}

/// Store backed by one JSON file.
///
/// Mutations within this process are serialized; other processes writing
/// the same path are not coordinated with.
pub struct FileRecipeStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileRecipeStore {
    /// Bind a store to `path`. Nothing is read or created until first use.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock_writes(&self) -> Result<MutexGuard<'_, ()>, AppError> {
        self.write_lock
            .lock()
            .map_err(|_| AppError::StorageMessage("File store write lock poisoned".to_string()))
    }

    fn read_document(&self) -> Result<RecipeDocument, AppError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(RecipeDocument::default());
            }
            Err(err) => {
                tracing::error!("Failed to read {}: {}", self.path.display(), err);
                return Err(err.into());
            }
        };
        if raw.trim().is_empty() {
            return Ok(RecipeDocument::default());
        }
        serde_json::from_str(&raw).map_err(|err| {
            tracing::error!("Failed to parse {}: {}", self.path.display(), err);
            AppError::from(err)
        })
    }

    fn write_document(&self, document: &RecipeDocument) -> Result<(), AppError> {
        let encoded = serde_json::to_vec_pretty(document)?;
        let parent = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(parent)?;

        let mut staged = tempfile::NamedTempFile::new_in(parent)?;
        staged.write_all(&encoded)?;
        staged.as_file().sync_all()?;
        staged.persist(&self.path)?;
        Ok(())
    }

    /// Load, mutate and (when `f` reports a change) rewrite the document.
    fn mutate<T>(
        &self,
        f: impl FnOnce(&mut RecipeDocument) -> Result<(T, bool), AppError>,
    ) -> Result<T, AppError> {
        let _guard = self.lock_writes()?;
        let mut document = self.read_document()?;
        let (result, changed) = f(&mut document)?;
        if changed {
            self.write_document(&document)?;
        }
        Ok(result)
    }
}

impl RecipeRepository for FileRecipeStore {
    fn find_all(
        &self,
        filter: &RecipeFilter,
        pagination: Option<Pagination>,
    ) -> Result<Vec<Recipe>, AppError> {
        let matching: Vec<Recipe> = self
            .read_document()?
            .recipes
            .into_iter()
            .filter(|recipe| filter.matches(recipe))
            .collect();
        Ok(match pagination {
            Some(window) => window.apply(matching),
            None => matching,
        })
    }

    fn find_by_id(&self, id: i64) -> Result<Option<Recipe>, AppError> {
        Ok(self
            .read_document()?
            .recipes
            .into_iter()
            .find(|recipe| recipe.id == id))
    }

    fn create(&self, recipe: NewRecipe) -> Result<Recipe, AppError> {
        self.mutate(|document| {
            let id = document.allocate_id()?;
            let stored = recipe.with_id(id);
            document.recipes.push(stored.clone());
            Ok((stored, true))
        })
    }

    fn update(&self, id: i64, patch: RecipePatch) -> Result<Option<Recipe>, AppError> {
        self.mutate(|document| match document.position(id) {
            Some(index) => {
                let changed = !patch.is_empty();
                patch.apply_to(&mut document.recipes[index]);
                Ok((Some(document.recipes[index].clone()), changed))
            }
            None => Ok((None, false)),
        })
    }

    fn delete(&self, id: i64) -> Result<bool, AppError> {
        self.mutate(|document| match document.position(id) {
            Some(index) => {
                document.recipes.remove(index);
                Ok((true, true))
            }
            None => Ok((false, false)),
        })
    }

    fn count(&self) -> Result<usize, AppError> {
        Ok(self.read_document()?.recipes.len())
    }
}
