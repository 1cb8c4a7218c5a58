//! Chat turn persistence handlers.
//!
//! Endpoints:
//! - POST /api/chat        - Validate and store a user turn
//! - POST /api/ai-response - Store an assistant turn
//!
//! The inference call itself happens on the console side; these endpoints
//! only persist. A failed inference after POST /api/chat therefore leaves
//! the user turn recorded with no assistant reply, by design.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};

use parley_core::store::message_store::MessageStore;
use parley_types::chat::{AiResponseRequest, ChatRequest};
use parley_types::error::FieldError;
use parley_types::message::{MessageRole, NewMessage};

use crate::http::error::AppError;
use crate::state::AppState;

/// Fold a body that failed to deserialize into the same 400 shape as a
/// schema violation (axum's default for these is 422).
fn bad_body(message: &str, rejection: JsonRejection) -> AppError {
    AppError::Validation {
        message: message.to_string(),
        details: vec![FieldError::new("body", rejection.body_text())],
    }
}

/// POST /api/chat - store the user turn of a chat request.
///
/// Validates against the chat schema before any write; violations return
/// 400 with field-level details.
pub async fn send_chat(
    State(state): State<AppState>,
    body: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let Json(body) = body.map_err(|r| bad_body("Invalid request data", r))?;
    body.validate().map_err(|details| AppError::Validation {
        message: "Invalid request data".to_string(),
        details,
    })?;

    state
        .store
        .create_message(&NewMessage::new(
            &body.session_id,
            MessageRole::User,
            &body.message,
            &body.model,
        ))
        .await
        .map_err(|e| AppError::from_store(e, "Failed to process chat message"))?;

    Ok(Json(json!({ "success": true, "userMessageStored": true })))
}

/// POST /api/ai-response - store an assistant turn.
///
/// 400 if any field is missing or empty; returns the persisted message
/// including its generated id and timestamp.
pub async fn store_ai_response(
    State(state): State<AppState>,
    body: Result<Json<AiResponseRequest>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let Json(body) = body.map_err(|r| bad_body("Missing required fields", r))?;
    body.validate().map_err(|details| AppError::Validation {
        message: "Missing required fields".to_string(),
        details,
    })?;

    let message = state
        .store
        .create_message(&NewMessage::new(
            &body.session_id,
            MessageRole::Assistant,
            &body.content,
            &body.model,
        ))
        .await
        .map_err(|e| AppError::from_store(e, "Failed to store AI response"))?;

    Ok(Json(json!({ "message": message })))
}
