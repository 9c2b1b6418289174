//! HTTP request handlers.

pub(crate) mod body;
pub(crate) mod query;
/// Recipe CRUD endpoints.
pub mod recipe;

use crate::AppState;
use axum::{extract::State, Json};
use serde_json::{json, Value};

/// Liveness probe naming the active backend.
pub async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "backend": state.store.backend().as_str(),
    }))
}
