//! Transcript read/clear handlers.
//!
//! Endpoints:
//! - GET    /api/messages/{session_id} - List a session's messages
//! - DELETE /api/messages/{session_id} - Clear a session

use axum::extract::{Path, State};
use axum::Json;
use serde_json::{json, Value};

use parley_core::store::message_store::MessageStore;
use parley_types::message::Message;

use crate::http::error::AppError;
use crate::state::AppState;

/// GET /api/messages/{session_id} - messages ascending by creation time.
///
/// An unknown session is an empty list, not an error.
pub async fn list_messages(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<Vec<Message>>, AppError> {
    let messages = state
        .store
        .list_messages(&session_id)
        .await
        .map_err(|e| AppError::from_store(e, "Failed to fetch messages"))?;

    Ok(Json(messages))
}

/// DELETE /api/messages/{session_id} - clear a session (idempotent).
pub async fn clear_messages(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    state
        .store
        .clear_session(&session_id)
        .await
        .map_err(|e| AppError::from_store(e, "Failed to clear messages"))?;

    Ok(Json(json!({ "success": true })))
}
