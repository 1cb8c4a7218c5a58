//! Session identifier generation.
//!
//! A session id is an opaque string minted once per chat-session start and
//! never reused after a clear. UUIDv7 keeps ids time-ordered, so session
//! keys sort by creation like the rest of the system's identifiers.

use uuid::Uuid;

/// Mint a fresh opaque session identifier.
pub fn new_session_id() -> String {
    format!("session-{}", Uuid::now_v7())
}
