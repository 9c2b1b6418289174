//! Translation of application errors into JSON HTTP responses.

use crate::AppError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

const NOT_FOUND_MESSAGE: &str = "Recipe not found";
const INTERNAL_MESSAGE: &str = "Internal server error";

/// Error returned by every handler.
#[derive(Debug)]
pub enum HttpError {
    App(AppError),
    /// The request body exceeded the configured limit.
    PayloadTooLarge,
}

impl From<AppError> for HttpError {
    fn from(value: AppError) -> Self {
        Self::App(value)
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let err = match self {
            Self::PayloadTooLarge => {
                return (
                    StatusCode::PAYLOAD_TOO_LARGE,
                    Json(json!({ "error": "Request body too large" })),
                )
                    .into_response();
            }
            Self::App(err) => err,
        };

        match err {
            AppError::NotFound => (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": NOT_FOUND_MESSAGE })),
            )
                .into_response(),
            AppError::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
            }
            AppError::Validation(details) => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "Validation failed", "details": details })),
            )
                .into_response(),
            other => {
                if other.is_storage_failure() {
                    tracing::error!("Storage failure: {}", other);
                } else {
                    tracing::error!("Internal error: {:?}", other);
                }
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": INTERNAL_MESSAGE })),
                )
                    .into_response()
            }
        }
    }
}
