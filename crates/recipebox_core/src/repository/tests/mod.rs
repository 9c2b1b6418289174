//! Behavioral tests shared by both recipe stores.

use super::*;
use crate::models::recipe::Difficulty;
use crate::test_support::{new_recipe, sample_recipes};
use tempfile::TempDir;

mod contract;

fn file_store() -> (RecipeStore, TempDir) {
    let temp = TempDir::new().expect("temp dir");
    let store = FileRecipeStore::new(temp.path().join("db.json"));
    (store.into(), temp)
}

fn sqlite_store() -> (RecipeStore, TempDir) {
    let temp = TempDir::new().expect("temp dir");
    let store = SqliteRecipeStore::open(temp.path().join("db.sqlite"), SqliteOptions::default())
        .expect("open sqlite");
    (store.into(), temp)
}

/// Insert the sample collection and return the stored records in order.
fn seed_samples(store: &RecipeStore) -> Vec<Recipe> {
    sample_recipes()
        .into_iter()
        .map(|recipe| store.create(recipe).expect("create"))
        .collect()
}
