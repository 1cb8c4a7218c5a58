//! MessageStore trait definition.
//!
//! CRUD contract over session-scoped transcripts. Both the local file
//! variant and the server-backed variants must satisfy it identically,
//! so the consuming layer is interchangeable across either backend.

use parley_types::error::StoreError;
use parley_types::message::{Message, NewMessage};

/// Store of immutable conversation messages, partitioned by session id.
///
/// Implementations live in parley-infra (`LocalFileMessageStore`,
/// `SqliteMessageStore`, `HttpMessageStore`).
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
pub trait MessageStore: Send + Sync {
    /// All messages for a session, ordered by creation time ascending
    /// (ties broken by insertion order).
    ///
    /// An unknown or empty session yields an empty Vec, never an error.
    fn list_messages(
        &self,
        session_id: &str,
    ) -> impl std::future::Future<Output = Result<Vec<Message>, StoreError>> + Send;

    /// Validate, assign a fresh id and current timestamp, and append.
    ///
    /// Returns the persisted message including the generated fields.
    /// Fails with `StoreError::Validation` before any write when a
    /// required field is missing or `content` is empty.
    fn create_message(
        &self,
        new: &NewMessage,
    ) -> impl std::future::Future<Output = Result<Message, StoreError>> + Send;

    /// Remove every message for a session.
    ///
    /// Idempotent: clearing an empty or nonexistent session succeeds
    /// silently.
    fn clear_session(
        &self,
        session_id: &str,
    ) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;
}

/// Shared field validation for `create_message` implementations.
///
/// Every variant applies the same rules so the contract cannot drift
/// between media.
pub fn validate_new_message(new: &NewMessage) -> Result<(), StoreError> {
    let mut errors = Vec::new();
    if new.content.is_empty() {
        errors.push(parley_types::error::FieldError::new(
            "content",
            "must not be empty",
        ));
    }
    if new.model.is_empty() {
        errors.push(parley_types::error::FieldError::new("model", "is required"));
    }
    if new.session_id.is_empty() {
        errors.push(parley_types::error::FieldError::new(
            "sessionId",
            "is required",
        ));
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(StoreError::Validation(errors))
    }
}
