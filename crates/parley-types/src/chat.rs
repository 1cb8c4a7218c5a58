//! Chat wire schemas and the inference gateway reply union.
//!
//! `ChatTurn` is the (role, content) projection sent to the gateway --
//! ids, models, and timestamps never leave the store's side of the seam.

use serde::{Deserialize, Serialize};

use crate::error::FieldError;
use crate::message::MessageRole;

/// One turn of prompt history as the inference gateway sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: MessageRole,
    pub content: String,
}

impl ChatTurn {
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// What the hosted inference service handed back, resolved immediately
/// after the call.
///
/// The service answers in one of two success shapes: a structured payload
/// carrying `message.content`, or a bare string. Failures are the `Err`
/// side of the gateway call and never reach this type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayReply {
    /// A `{"message": {"content": ...}}` payload.
    Structured { content: String },
    /// A bare string payload.
    Plain(String),
}

impl GatewayReply {
    /// Extract the generated text, if any.
    ///
    /// An empty body in either shape counts as "no text" -- callers fall
    /// back to a placeholder literal rather than storing an empty message.
    pub fn into_text(self) -> Option<String> {
        match self {
            GatewayReply::Structured { content } | GatewayReply::Plain(content) => {
                if content.is_empty() {
                    None
                } else {
                    Some(content)
                }
            }
        }
    }
}

/// Request body for POST /api/chat.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub message: String,
    pub model: String,
    pub session_id: String,
}

impl ChatRequest {
    /// Schema validation: `message` must be non-empty; `model` and
    /// `sessionId` must be present strings (serde enforces the type).
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();
        if self.message.is_empty() {
            errors.push(FieldError::new("message", "must contain at least 1 character"));
        }
        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

/// Request body for POST /api/ai-response.
///
/// All three fields are required and non-empty; the service persists an
/// assistant turn from them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiResponseRequest {
    pub content: String,
    pub model: String,
    pub session_id: String,
}

impl AiResponseRequest {
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();
        if self.content.is_empty() {
            errors.push(FieldError::new("content", "is required"));
        }
        if self.model.is_empty() {
            errors.push(FieldError::new("model", "is required"));
        }
        if self.session_id.is_empty() {
            errors.push(FieldError::new("sessionId", "is required"));
        }
        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}
