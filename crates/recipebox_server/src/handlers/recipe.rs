//! Recipe HTTP handlers.

use super::body::json_body;
use super::query::ListQuery;
use crate::{error::HttpError, AppError, AppState, RecipeRepository};
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use recipebox_core::validation::{validate_create, validate_update};
use recipebox_core::Recipe;
use serde_json::Value;

/// Path ids that are not integers can never match a stored record.
fn parse_id(raw: &str) -> Result<i64, HttpError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| AppError::NotFound.into())
}

/// List recipes, optionally filtered and paginated.
///
/// # Errors
/// Returns an error if the query string cannot be decoded or the store fails.
pub async fn list_recipes(
    State(state): State<AppState>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<Vec<Recipe>>, HttpError> {
    let Query(query) = query
        .map_err(|err| AppError::BadRequest(format!("Invalid query string: {}", err.body_text())))?;
    let recipes = state
        .store
        .find_all(&query.filter(), query.pagination())?;
    Ok(Json(recipes))
}

/// Fetch a recipe by id.
///
/// # Errors
/// Returns [`AppError::NotFound`] if the recipe does not exist.
pub async fn get_recipe(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Recipe>, HttpError> {
    let id = parse_id(&id)?;
    state
        .store
        .find_by_id(id)?
        .map(Json)
        .ok_or_else(|| AppError::NotFound.into())
}

/// Create a recipe from a fully validated payload.
///
/// # Returns
/// `201 Created` with the stored recipe, including its new id.
///
/// # Errors
/// Returns a validation error listing every failing field, or a storage error.
pub async fn create_recipe(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Recipe>), HttpError> {
    let payload = json_body(payload)?;
    let recipe = validate_create(&payload)?;
    let created = state.store.create(recipe)?;
    tracing::debug!("Created recipe {}", created.id);
    Ok((StatusCode::CREATED, Json(created)))
}

/// Merge the supplied fields over an existing recipe.
///
/// The path id wins over any `id` in the body.
pub async fn update_recipe(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Recipe>, HttpError> {
    let id = parse_id(&id)?;
    let payload = json_body(payload)?;
    let patch = validate_update(&payload)?;
    state
        .store
        .update(id, patch)?
        .map(Json)
        .ok_or_else(|| AppError::NotFound.into())
}

/// Delete a recipe; `204 No Content` on success.
pub async fn delete_recipe(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, HttpError> {
    let id = parse_id(&id)?;
    if state.store.delete(id)? {
        tracing::debug!("Deleted recipe {}", id);
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound.into())
    }
}
