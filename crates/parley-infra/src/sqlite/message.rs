//! SQLite message store implementation.
//!
//! Implements `MessageStore` from `parley-core` using sqlx with split
//! read/write pools: raw queries, a private Row struct, reader for SELECTs,
//! writer for mutations. This is the medium behind the persistence service;
//! `created_at` is assigned here at insert time.

use chrono::{DateTime, Utc};
use sqlx::Row;
use uuid::Uuid;

use parley_core::store::message_store::{validate_new_message, MessageStore};
use parley_types::error::StoreError;
use parley_types::message::{Message, MessageRole, NewMessage};

use super::pool::DatabasePool;

/// SQLite-backed implementation of `MessageStore`.
pub struct SqliteMessageStore {
    pool: DatabasePool,
}

impl SqliteMessageStore {
    /// Create a new store backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

// ---------------------------------------------------------------------------
// Private Row type for SQLite-to-domain mapping
// ---------------------------------------------------------------------------

struct MessageRow {
    id: String,
    session_id: String,
    role: String,
    content: String,
    model: String,
    created_at: String,
}

impl MessageRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            session_id: row.try_get("session_id")?,
            role: row.try_get("role")?,
            content: row.try_get("content")?,
            model: row.try_get("model")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_message(self) -> Result<Message, StoreError> {
        let id = Uuid::parse_str(&self.id)
            .map_err(|e| StoreError::Storage(format!("invalid message id: {e}")))?;
        let role: MessageRole = self
            .role
            .parse()
            .map_err(|e: String| StoreError::Storage(e))?;
        let created_at = parse_datetime(&self.created_at)?;

        Ok(Message {
            id,
            session_id: self.session_id,
            role,
            content: self.content,
            model: self.model,
            created_at,
        })
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn parse_datetime(s: &str) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| StoreError::Storage(format!("invalid datetime: {e}")))
}

fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

// ---------------------------------------------------------------------------
// MessageStore implementation
// ---------------------------------------------------------------------------

impl MessageStore for SqliteMessageStore {
    async fn list_messages(&self, session_id: &str) -> Result<Vec<Message>, StoreError> {
        // rowid as the secondary key pins the insertion-order tiebreak for
        // equal timestamps.
        let rows = sqlx::query(
            "SELECT * FROM messages WHERE session_id = ? ORDER BY created_at ASC, rowid ASC",
        )
        .bind(session_id)
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| StoreError::Storage(e.to_string()))?;

        let mut messages = Vec::with_capacity(rows.len());
        for row in &rows {
            let msg_row =
                MessageRow::from_row(row).map_err(|e| StoreError::Storage(e.to_string()))?;
            messages.push(msg_row.into_message()?);
        }

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

        sqlx::query(
            r#"INSERT INTO messages (id, session_id, role, content, model, created_at)
               VALUES (?, ?, ?, ?, ?, ?)"#,
        )
        .bind(message.id.to_string())
        .bind(&message.session_id)
        .bind(message.role.to_string())
        .bind(&message.content)
        .bind(&message.model)
        .bind(format_datetime(&message.created_at))
        .execute(&self.pool.writer)
        .await
        .map_err(|e| StoreError::Storage(e.to_string()))?;

        Ok(message)
    }

    async fn clear_session(&self, session_id: &str) -> Result<(), StoreError> {
        // Deleting zero rows is a success: clear is idempotent.
        sqlx::query("DELETE FROM messages WHERE session_id = ?")
            .bind(session_id)
            .execute(&self.pool.writer)
            .await
            .map_err(|e| StoreError::Storage(e.to_string()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_store() -> SqliteMessageStore {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let url = format!("sqlite://{}?mode=rwc", db_path.display());
        // Leak tempdir so it lives for the test
        std::mem::forget(dir);
        SqliteMessageStore::new(DatabasePool::new(&url).await.unwrap())
    }

    fn user_msg(session_id: &str, content: &str) -> NewMessage {
        NewMessage::new(session_id, MessageRole::User, content, "gpt-5")
    }

    #[tokio::test]
    async fn test_round_trip_preserves_fields_and_generates_the_rest() {
        let store = test_store().await;

        let created = store
            .create_message(&NewMessage::new(
                "s1",
                MessageRole::Assistant,
                "Hi there",
                "claude-3-5-sonnet",
            ))
            .await
            .unwrap();

        let listed = store.list_messages("s1").await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, created.id);
        assert_eq!(listed[0].session_id, "s1");
        assert_eq!(listed[0].role, MessageRole::Assistant);
        assert_eq!(listed[0].content, "Hi there");
        assert_eq!(listed[0].model, "claude-3-5-sonnet");
        assert_eq!(listed[0].created_at, created.created_at);
    }

    #[tokio::test]
    async fn test_list_orders_ascending_and_counts_creates() {
        let store = test_store().await;

        for i in 0..5 {
            store
                .create_message(&user_msg("s1", &format!("message {i}")))
                .await
                .unwrap();
        }

        let messages = store.list_messages("s1").await.unwrap();
        assert_eq!(messages.len(), 5);
        for (i, msg) in messages.iter().enumerate() {
            assert_eq!(msg.content, format!("message {i}"));
        }
        for pair in messages.windows(2) {
            assert!(pair[0].created_at <= pair[1].created_at);
        }
    }

    #[tokio::test]
    async fn test_unknown_session_lists_empty() {
        let store = test_store().await;
        let messages = store.list_messages("nope").await.unwrap();
        assert!(messages.is_empty());
    }

    #[tokio::test]
    async fn test_empty_content_is_rejected_without_a_write() {
        let store = test_store().await;

        let err = store.create_message(&user_msg("s1", "")).await.unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));

        let messages = store.list_messages("s1").await.unwrap();
        assert!(messages.is_empty());
    }

    #[tokio::test]
    async fn test_clear_session_is_idempotent() {
        let store = test_store().await;

        store.create_message(&user_msg("s1", "Hello")).await.unwrap();
        store.clear_session("s1").await.unwrap();
        assert!(store.list_messages("s1").await.unwrap().is_empty());

        // Clearing again (and clearing a session that never existed) succeeds.
        store.clear_session("s1").await.unwrap();
        store.clear_session("never-created").await.unwrap();
    }

    #[tokio::test]
    async fn test_sessions_never_leak_across_interleaved_creates() {
        let store = test_store().await;

        store.create_message(&user_msg("s1", "a1")).await.unwrap();
        store.create_message(&user_msg("s2", "b1")).await.unwrap();
        store.create_message(&user_msg("s1", "a2")).await.unwrap();
        store.create_message(&user_msg("s2", "b2")).await.unwrap();

        let s1 = store.list_messages("s1").await.unwrap();
        let s2 = store.list_messages("s2").await.unwrap();
        assert_eq!(
            s1.iter().map(|m| m.content.as_str()).collect::<Vec<_>>(),
            vec!["a1", "a2"]
        );
        assert_eq!(
            s2.iter().map(|m| m.content.as_str()).collect::<Vec<_>>(),
            vec!["b1", "b2"]
        );

        store.clear_session("s1").await.unwrap();
        assert!(store.list_messages("s1").await.unwrap().is_empty());
        assert_eq!(store.list_messages("s2").await.unwrap().len(), 2);
    }
}
