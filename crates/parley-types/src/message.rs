//! Message and session types for Parley.
//!
//! A conversation is the set of messages sharing a `session_id`; there is
//! no session record beyond that grouping key. Messages are immutable after
//! creation -- the store exposes create, list, and clear-session only.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

/// Role of a conversation turn.
///
/// Maps to the CHECK constraint in the SQLite schema:
/// `CHECK (role IN ('user', 'assistant'))`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageRole::User => write!(f, "user"),
            MessageRole::Assistant => write!(f, "assistant"),
        }
    }
}

impl FromStr for MessageRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(MessageRole::User),
            "assistant" => Ok(MessageRole::Assistant),
            other => Err(format!("invalid message role: '{other}'")),
        }
    }
}

/// A single turn in a conversation.
///
/// `model` is recorded on user turns as well, so the transcript shows which
/// model each exchange was addressed to. Within a session, messages are
/// ordered by `created_at` ascending, ties broken by insertion order.
///
/// Wire field names are camelCase (`sessionId`, `createdAt`) to match the
/// persistence service's JSON surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: Uuid,
    pub session_id: String,
    pub role: MessageRole,
    pub content: String,
    pub model: String,
    pub created_at: DateTime<Utc>,
}

/// Payload for creating a message.
///
/// The store assigns `id` and `created_at`; everything else comes from the
/// caller and must be non-empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMessage {
    pub session_id: String,
    pub role: MessageRole,
    pub content: String,
    pub model: String,
}

impl NewMessage {
    pub fn new(
        session_id: impl Into<String>,
        role: MessageRole,
        content: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            session_id: session_id.into(),
            role,
            content: content.into(),
            model: model.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_role_roundtrip() {
        for role in [MessageRole::User, MessageRole::Assistant] {
            let s = role.to_string();
            let parsed: MessageRole = s.parse().unwrap();
            assert_eq!(role, parsed);
        }
    }

    #[test]
    fn test_message_role_rejects_system() {
        assert!("system".parse::<MessageRole>().is_err());
    }

    #[test]
    fn test_message_role_serde() {
        let role = MessageRole::Assistant;
        let json = serde_json::to_string(&role).unwrap();
        assert_eq!(json, "\"assistant\"");
        let parsed: MessageRole = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, MessageRole::Assistant);
    }

    #[test]
    fn test_message_wire_names_are_camel_case() {
        let msg = Message {
            id: Uuid::now_v7(),
            session_id: "session-1".to_string(),
            role: MessageRole::User,
            content: "Hello".to_string(),
            model: "gpt-5".to_string(),
            created_at: Utc::now(),
        };
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("\"sessionId\":\"session-1\""));
        assert!(json.contains("\"createdAt\""));
        assert!(!json.contains("session_id"));
    }

    #[test]
    fn test_message_roundtrip() {
        let msg = Message {
            id: Uuid::now_v7(),
            session_id: "session-1".to_string(),
            role: MessageRole::Assistant,
            content: "Hi there".to_string(),
            model: "claude-3-5-sonnet".to_string(),
            created_at: Utc::now(),
        };
        let json = serde_json::to_string(&msg).unwrap();
        let parsed: Message = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.id, msg.id);
        assert_eq!(parsed.role, msg.role);
        assert_eq!(parsed.content, msg.content);
    }
}
