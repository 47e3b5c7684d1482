//! Error types for the waitlist service.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::store::{DuplicateField, StoreError};

/// A single field that failed validation, with the reason.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Service error types.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Validation failed for {} field(s)", .0.len())]
    Validation(Vec<FieldError>),

    #[error("Already on the waitlist: duplicate {0}")]
    Conflict(DuplicateField),

    #[error("Invalid admin key")]
    Unauthorized,

    #[error("Not found")]
    NotFound,

    #[error("Record store unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
    /// Per-field diagnostics for validation failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<FieldError>>,
    /// Which unique fields collided for conflicts.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conflicts: Option<Vec<&'static str>>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_FAILED"),
            ApiError::Conflict(_) => (StatusCode::CONFLICT, "DUPLICATE_CONTACT"),
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            ApiError::NotFound => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::StorageUnavailable(_) => {
                (StatusCode::SERVICE_UNAVAILABLE, "STORAGE_UNAVAILABLE")
            }
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };

        let (fields, conflicts) = match &self {
            ApiError::Validation(errors) => (Some(errors.clone()), None),
            ApiError::Conflict(duplicate) => (None, Some(duplicate.fields())),
            _ => (None, None),
        };

        let body = ErrorResponse {
            error: self.to_string(),
            code: code.to_string(),
            fields,
            conflicts,
        };

        (status, Json(body)).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Duplicate(field) => ApiError::Conflict(field),
            StoreError::Unavailable(message) => ApiError::StorageUnavailable(message),
            StoreError::Database(message) => ApiError::Internal(message),
        }
    }
}
