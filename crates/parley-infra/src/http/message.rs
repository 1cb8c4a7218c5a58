//! HTTP message store implementation.
//!
//! Implements `MessageStore` against the persistence service's API.
//! Unlike the local file variant, failures here are loud: network errors
//! and non-2xx responses surface as `StoreError::Storage` (or
//! `StoreError::Validation` when the service returns structured field
//! errors), with no automatic retry.

use std::time::Duration;

use parley_core::store::message_store::{validate_new_message, MessageStore};
use parley_types::chat::{AiResponseRequest, ChatRequest};
use parley_types::error::{FieldError, StoreError};
use parley_types::message::{Message, MessageRole, NewMessage};

/// Client-side `MessageStore` backed by the persistence service.
pub struct HttpMessageStore {
    client: reqwest::Client,
    base_url: String,
}

/// Error envelope returned by the service on 4xx/5xx.
#[derive(Debug, serde::Deserialize)]
struct ErrorBody {
    error: String,
    #[serde(default)]
    details: Option<Vec<FieldError>>,
}

/// Body of a successful POST /api/ai-response.
#[derive(Debug, serde::Deserialize)]
struct AiResponseBody {
    message: Message,
}

impl HttpMessageStore {
    /// Create a client for the service at `base_url`
    /// (e.g., "http://127.0.0.1:8787").
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_default();

        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Map a non-2xx response to the matching store error.
    async fn error_from(response: reqwest::Response) -> StoreError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        match serde_json::from_str::<ErrorBody>(&body) {
            Ok(parsed) => {
                if let Some(details) = parsed.details.filter(|_| status.as_u16() == 400) {
                    StoreError::Validation(details)
                } else {
                    StoreError::Storage(format!("HTTP {status}: {}", parsed.error))
                }
            }
            Err(_) => StoreError::Storage(format!("HTTP {status}: {body}")),
        }
    }
}

impl MessageStore for HttpMessageStore {
    async fn list_messages(&self, session_id: &str) -> Result<Vec<Message>, StoreError> {
        let response = self
            .client
            .get(self.url(&format!("/api/messages/{session_id}")))
            .send()
            .await
            .map_err(|e| StoreError::Storage(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }

        response
            .json::<Vec<Message>>()
            .await
            .map_err(|e| StoreError::Storage(e.to_string()))
    }

    async fn create_message(&self, new: &NewMessage) -> Result<Message, StoreError> {
        // Same fail-fast validation as every other variant; the service
        // re-checks on its side.
        validate_new_message(new)?;

        match new.role {
            MessageRole::Assistant => {
                let body = AiResponseRequest {
                    content: new.content.clone(),
                    model: new.model.clone(),
                    session_id: new.session_id.clone(),
                };
                let response = self
                    .client
                    .post(self.url("/api/ai-response"))
                    .json(&body)
                    .send()
                    .await
                    .map_err(|e| StoreError::Storage(e.to_string()))?;

                if !response.status().is_success() {
                    return Err(Self::error_from(response).await);
                }

                let parsed: AiResponseBody = response
                    .json()
                    .await
                    .map_err(|e| StoreError::Storage(e.to_string()))?;
                Ok(parsed.message)
            }
            MessageRole::User => {
                let body = ChatRequest {
                    message: new.content.clone(),
                    model: new.model.clone(),
                    session_id: new.session_id.clone(),
                };
                let response = self
                    .client
                    .post(self.url("/api/chat"))
                    .json(&body)
                    .send()
                    .await
                    .map_err(|e| StoreError::Storage(e.to_string()))?;

                if !response.status().is_success() {
                    return Err(Self::error_from(response).await);
                }

                // The chat endpoint acknowledges without echoing the stored
                // row, so re-read the tail to return the persisted message.
                // Safe under the controller's per-session single-flight rule.
                let messages = self.list_messages(&new.session_id).await?;
                messages
                    .into_iter()
                    .rev()
                    .find(|m| m.role == MessageRole::User)
                    .ok_or_else(|| {
                        StoreError::Storage(
                            "service acknowledged the user message but it is not listed"
                                .to_string(),
                        )
                    })
            }
        }
    }

    async fn clear_session(&self, session_id: &str) -> Result<(), StoreError> {
        let response = self
            .client
            .delete(self.url(&format!("/api/messages/{session_id}")))
            .send()
            .await
            .map_err(|e| StoreError::Storage(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_is_normalized() {
        let store = HttpMessageStore::new("http://localhost:8787/");
        assert_eq!(
            store.url("/api/messages/session-1"),
            "http://localhost:8787/api/messages/session-1"
        );
    }

    #[test]
    fn test_error_body_with_details_deserializes() {
        let body = r#"{"error":"Invalid request data","details":[{"field":"message","message":"must contain at least 1 character"}]}"#;
        let parsed: ErrorBody = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.error, "Invalid request data");
        assert_eq!(parsed.details.unwrap()[0].field, "message");
    }

    #[test]
    fn test_error_body_without_details_deserializes() {
        let body = r#"{"error":"Failed to fetch messages"}"#;
        let parsed: ErrorBody = serde_json::from_str(body).unwrap();
        assert!(parsed.details.is_none());
    }

    #[tokio::test]
    async fn test_create_message_validates_before_any_request() {
        // An unroutable base URL: if validation didn't fail first, this
        // would surface as a transport error instead.
        let store = HttpMessageStore::new("http://127.0.0.1:1");
        let err = store
            .create_message(&NewMessage::new("s1", MessageRole::User, "", "gpt-5"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
    }
}
