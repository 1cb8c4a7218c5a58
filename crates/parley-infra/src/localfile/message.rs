//! Local file message store implementation.
//!
//! Implements `MessageStore` with one serialized collection per session,
//! stored as `messages-<session>.json` under the data directory. Malformed
//! stored data is treated as empty: corruption is dropped on read rather
//! than surfaced, so a damaged file costs one session's history and nothing
//! else.

use std::path::{Path, PathBuf};

use chrono::Utc;
use tokio::sync::Mutex;
use uuid::Uuid;

use parley_core::store::message_store::{validate_new_message, MessageStore};
use parley_types::error::StoreError;
use parley_types::message::{Message, NewMessage};

/// File-backed implementation of `MessageStore`.
pub struct LocalFileMessageStore {
    data_dir: PathBuf,
    /// Serializes read-modify-write cycles so interleaved appends across
    /// sessions cannot tear a collection mid-rewrite.
    write_lock: Mutex<()>,
}

impl LocalFileMessageStore {
    /// Create a store rooted at the given data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Path of the per-session collection file.
    ///
    /// Session ids are minted locally, but never trust them as path
    /// components.
    fn session_file(&self, session_id: &str) -> PathBuf {
        let safe: String = session_id
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.data_dir.join(format!("messages-{safe}.json"))
    }

    /// Read a session's collection, recovering malformed or missing data
    /// as empty.
    async fn read_collection(&self, path: &Path) -> Vec<Message> {
        let content = match tokio::fs::read_to_string(path).await {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
            Err(err) => {
                tracing::debug!(path = %path.display(), "unreadable session file: {err}");
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<Message>>(&content) {
            Ok(messages) => messages,
            Err(err) => {
                tracing::debug!(path = %path.display(), "malformed session file dropped: {err}");
                Vec::new()
            }
        }
    }

    async fn write_collection(&self, path: &Path, messages: &[Message]) -> Result<(), StoreError> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StoreError::Storage(e.to_string()))?;
        }
        let json =
            serde_json::to_string(messages).map_err(|e| StoreError::Storage(e.to_string()))?;
        tokio::fs::write(path, json)
            .await
            .map_err(|e| StoreError::Storage(e.to_string()))
    }
}

impl MessageStore for LocalFileMessageStore {
    async fn list_messages(&self, session_id: &str) -> Result<Vec<Message>, StoreError> {
        let mut messages = self.read_collection(&self.session_file(session_id)).await;
        // Stable sort keeps insertion order for equal timestamps.
        messages.sort_by_key(|m| m.created_at);
        Ok(messages)
    }

    async fn create_message(&self, new: &NewMessage) -> Result<Message, StoreError> {
        validate_new_message(new)?;

        let message = Message {
            id: Uuid::now_v7(),
            session_id: new.session_id.clone(),
            role: new.role,
            content: new.content.clone(),
            model: new.model.clone(),
            created_at: Utc::now(),
        };

        let path = self.session_file(&new.session_id);
        let _guard = self.write_lock.lock().await;
        let mut messages = self.read_collection(&path).await;
        messages.push(message.clone());
        self.write_collection(&path, &messages).await?;

        Ok(message)
    }

    async fn clear_session(&self, session_id: &str) -> Result<(), StoreError> {
        let path = self.session_file(session_id);
        let _guard = self.write_lock.lock().await;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            // Already empty or never existed: clear is idempotent.
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(StoreError::Storage(err.to_string())),
        }
    }
}
