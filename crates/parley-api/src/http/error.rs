//! Application error type mapping to HTTP status codes.
//!
//! The wire format is `{"error": "...", "details": [...]}` -- `details`
//! only appears on validation failures and carries per-field errors.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use parley_types::error::{FieldError, StoreError};

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// 400 with structured field errors.
    Validation {
        message: String,
        details: Vec<FieldError>,
    },
    /// 500 with an endpoint-specific message.
    Internal(String),
}

impl AppError {
    /// Map a store failure, keeping validation details and substituting
    /// the endpoint's message for storage failures.
    pub fn from_store(err: StoreError, internal_message: &str) -> Self {
        match err {
            StoreError::Validation(details) => AppError::Validation {
                message: "Invalid request data".to_string(),
                details,
            },
            StoreError::Storage(cause) => {
                tracing::error!(%cause, "storage failure");
                AppError::Internal(internal_message.to_string())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::Validation { message, details } => (
                StatusCode::BAD_REQUEST,
                json!({ "error": message, "details": details }),
            ),
            AppError::Internal(message) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": message }),
            ),
        };

        (
            status,
            [(axum::http::header::CONTENT_TYPE, "application/json")],
            body.to_string(),
        )
            .into_response()
    }
}
