use thiserror::Error;

/// A single field-level validation failure.
///
/// Serialized into the `details` array of a 400 response.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Errors from message store operations (used by trait definitions in parley-core).
///
/// Validation failures are rejected before any mutation occurs; storage
/// failures surface the underlying medium's error text. The local file
/// variant never returns `Storage` for malformed data -- corrupt state is
/// recovered as empty rather than surfaced.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("validation failed: {}", format_fields(.0))]
    Validation(Vec<FieldError>),

    #[error("storage error: {0}")]
    Storage(String),
}

impl StoreError {
    /// Single-field validation failure.
    pub fn invalid(field: &str, message: &str) -> Self {
        StoreError::Validation(vec![FieldError::new(field, message)])
    }
}

fn format_fields(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Errors from the inference gateway.
///
/// The gateway is an opaque third-party call: no retry is applied here and
/// no timeout is guaranteed. The user's own message stays persisted when a
/// turn fails with one of these.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("gateway returned HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("gateway request failed: {0}")]
    Transport(String),

    #[error("gateway response unreadable: {0}")]
    Deserialization(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_display_lists_fields() {
        let err = StoreError::Validation(vec![
            FieldError::new("content", "must not be empty"),
            FieldError::new("model", "is required"),
        ]);
        let text = err.to_string();
        assert!(text.contains("content: must not be empty"));
        assert!(text.contains("model: is required"));
    }

    #[test]
    fn test_invalid_constructor() {
        let err = StoreError::invalid("sessionId", "is required");
        match err {
            StoreError::Validation(fields) => {
                assert_eq!(fields.len(), 1);
                assert_eq!(fields[0].field, "sessionId");
            }
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn test_gateway_error_display() {
        let err = GatewayError::Http {
            status: 429,
            message: "rate limited".to_string(),
        };
        assert!(err.to_string().contains("429"));
        assert!(err.to_string().contains("rate limited"));
    }
}
