//! JSON body extraction with uniform error bodies.

use crate::error::HttpError;
use crate::AppError;
use axum::{extract::rejection::JsonRejection, http::StatusCode, Json};
use serde_json::Value;

/// Unwrap an extracted JSON body, turning extractor rejections into API errors.
///
/// Oversized bodies keep their 413 status; every other rejection (bad
/// syntax, missing content type) becomes 400 "Invalid JSON body".
pub(super) fn json_body(payload: Result<Json<Value>, JsonRejection>) -> Result<Value, HttpError> {
    match payload {
        Ok(Json(value)) => Ok(value),
        Err(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            Err(HttpError::PayloadTooLarge)
        }
        Err(rejection) => {
            tracing::debug!("Rejected request body: {}", rejection.body_text());
            Err(AppError::BadRequest("Invalid JSON body".to_string()).into())
        }
    }
}
