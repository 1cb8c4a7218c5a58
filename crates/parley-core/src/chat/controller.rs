//! Conversation controller orchestrating turn-taking.
//!
//! A turn moves through `Idle -> Sending -> (Succeeded | Failed) -> Idle`.
//! The user message is persisted before the gateway call, so a failed turn
//! leaves the user's side of the exchange in the transcript with no
//! assistant reply -- callers surface the error instead of a phantom
//! message. Only `Sending` blocks admission of another submit for the same
//! session; sessions are independent and may have concurrent in-flight
//! turns.

use dashmap::DashMap;
use tracing::{info, warn};

use parley_types::chat::ChatTurn;
use parley_types::error::{GatewayError, StoreError};
use parley_types::message::{Message, MessageRole, NewMessage};

use crate::gateway::BoxInferenceGateway;
use crate::store::BoxMessageStore;

/// Literal stored when the gateway reply carries no extractable text.
pub const NO_RESPONSE_FALLBACK: &str = "No response received";

/// Per-session turn state.
///
/// `Succeeded` and `Failed` are terminal snapshots of the last turn and
/// admit a new submit exactly like `Idle`; only `Sending` blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TurnState {
    #[default]
    Idle,
    Sending,
    Succeeded,
    Failed,
}

/// A completed turn: the persisted user message and the assistant reply.
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    pub user_message: Message,
    pub assistant_message: Message,
}

/// Errors from `submit`.
///
/// `Gateway` and the post-user-write `Store` failures leave the user
/// message persisted; nothing is rolled back.
#[derive(Debug, thiserror::Error)]
pub enum TurnError {
    #[error("message is empty")]
    EmptyMessage,

    #[error("a send is already in flight for this session")]
    Busy,

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

/// Orchestrates turn-taking between the message store and the inference
/// gateway.
///
/// Takes type-erased store and gateway handles so the backend variant is a
/// startup decision, invisible here.
pub struct ConversationController {
    store: BoxMessageStore,
    gateway: BoxInferenceGateway,
    /// Token-limit hint forwarded on every gateway call.
    max_tokens: u32,
    turns: DashMap<String, TurnState>,
}

/// Resets a session's turn state when the submit future completes or is
/// dropped mid-flight, so a cancelled send can never leave the session
/// stuck in `Sending`.
struct TurnGuard<'a> {
    turns: &'a DashMap<String, TurnState>,
    session_id: &'a str,
    finished: bool,
}

impl<'a> TurnGuard<'a> {
    fn finish(mut self, state: TurnState) {
        self.turns.insert(self.session_id.to_string(), state);
        self.finished = true;
    }
}

impl Drop for TurnGuard<'_> {
    fn drop(&mut self) {
        if !self.finished {
            self.turns
                .insert(self.session_id.to_string(), TurnState::Idle);
        }
    }
}

impl ConversationController {
    pub fn new(store: BoxMessageStore, gateway: BoxInferenceGateway, max_tokens: u32) -> Self {
        Self {
            store,
            gateway,
            max_tokens,
            turns: DashMap::new(),
        }
    }

    /// Access the underlying message store.
    pub fn store(&self) -> &BoxMessageStore {
        &self.store
    }

    /// Current turn state for a session.
    pub fn state(&self, session_id: &str) -> TurnState {
        self.turns
            .get(session_id)
            .map(|entry| *entry)
            .unwrap_or_default()
    }

    /// Full ordered transcript for a session.
    pub async fn history(&self, session_id: &str) -> Result<Vec<Message>, StoreError> {
        self.store.list_messages(session_id).await
    }

    /// Run one conversation turn.
    ///
    /// Persists the user message, sends the full (role, content) history to
    /// the gateway, and persists the reply under the same model. The
    /// gateway call is the sole suspension point of any length; no lock is
    /// held across it, and no timeout or retry is applied here.
    pub async fn submit(
        &self,
        text: &str,
        model: &str,
        session_id: &str,
    ) -> Result<TurnOutcome, TurnError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(TurnError::EmptyMessage);
        }

        // Cooperative single-flight admission: the entry lock covers only
        // the check-and-set, never an await.
        {
            let mut entry = self
                .turns
                .entry(session_id.to_string())
                .or_insert(TurnState::Idle);
            if *entry == TurnState::Sending {
                return Err(TurnError::Busy);
            }
            *entry = TurnState::Sending;
        }
        let guard = TurnGuard {
            turns: &self.turns,
            session_id,
            finished: false,
        };

        let user_message = match self
            .store
            .create_message(&NewMessage::new(session_id, MessageRole::User, text, model))
            .await
        {
            Ok(message) => message,
            Err(e) => {
                guard.finish(TurnState::Failed);
                return Err(e.into());
            }
        };

        let history = match self.store.list_messages(session_id).await {
            Ok(messages) => messages,
            Err(e) => {
                guard.finish(TurnState::Failed);
                return Err(e.into());
            }
        };
        let turns: Vec<ChatTurn> = history
            .iter()
            .map(|m| ChatTurn::new(m.role, m.content.clone()))
            .collect();

        let reply = match self.gateway.generate(&turns, model, self.max_tokens).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!(session_id, gateway = self.gateway.name(), error = %e, "turn failed");
                guard.finish(TurnState::Failed);
                return Err(e.into());
            }
        };

        let content = reply
            .into_text()
            .unwrap_or_else(|| NO_RESPONSE_FALLBACK.to_string());

        let assistant_message = match self
            .store
            .create_message(&NewMessage::new(
                session_id,
                MessageRole::Assistant,
                content,
                model,
            ))
            .await
        {
            Ok(message) => message,
            Err(e) => {
                guard.finish(TurnState::Failed);
                return Err(e.into());
            }
        };

        info!(session_id, model, "turn completed");
        guard.finish(TurnState::Succeeded);
        Ok(TurnOutcome {
            user_message,
            assistant_message,
        })
    }

    /// Clear a session's transcript.
    ///
    /// Does not cancel an in-flight send: a turn completing after a clear
    /// appends its assistant message to the now-empty session.
    pub async fn clear(&self, session_id: &str) -> Result<(), StoreError> {
        self.store.clear_session(session_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use chrono::Utc;
    use tokio::sync::{Mutex, Notify};
    use uuid::Uuid;

    use parley_types::chat::GatewayReply;
    use crate::gateway::InferenceGateway;
    use crate::store::message_store::{validate_new_message, MessageStore};

    /// In-memory store double: insertion-ordered Vec behind a mutex.
    #[derive(Default)]
    struct MemoryStore {
        messages: Mutex<Vec<Message>>,
    }

    impl MessageStore for Arc<MemoryStore> {
        async fn list_messages(&self, session_id: &str) -> Result<Vec<Message>, StoreError> {
            let messages = self.messages.lock().await;
            let mut out: Vec<Message> = messages
                .iter()
                .filter(|m| m.session_id == session_id)
                .cloned()
                .collect();
            out.sort_by_key(|m| m.created_at);
            Ok(out)
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
            self.messages.lock().await.push(message.clone());
            Ok(message)
        }

        async fn clear_session(&self, session_id: &str) -> Result<(), StoreError> {
            self.messages
                .lock()
                .await
                .retain(|m| m.session_id != session_id);
            Ok(())
        }
    }

    /// Scripted gateway double.
    enum Script {
        Structured(&'static str),
        Plain(&'static str),
        Empty,
        Fail,
        /// Block until released, then answer.
        Slow(Arc<Notify>, &'static str),
    }

    struct ScriptedGateway {
        script: Script,
    }

    impl InferenceGateway for ScriptedGateway {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn generate(
            &self,
            _history: &[ChatTurn],
            _model: &str,
            _max_tokens: u32,
        ) -> Result<GatewayReply, GatewayError> {
            match &self.script {
                Script::Structured(text) => Ok(GatewayReply::Structured {
                    content: text.to_string(),
                }),
                Script::Plain(text) => Ok(GatewayReply::Plain(text.to_string())),
                Script::Empty => Ok(GatewayReply::Structured {
                    content: String::new(),
                }),
                Script::Fail => Err(GatewayError::Transport("connection reset".to_string())),
                Script::Slow(release, text) => {
                    release.notified().await;
                    Ok(GatewayReply::Plain(text.to_string()))
                }
            }
        }
    }

    fn controller(store: Arc<MemoryStore>, script: Script) -> ConversationController {
        ConversationController::new(
            BoxMessageStore::new(store),
            BoxInferenceGateway::new(ScriptedGateway { script }),
            1000,
        )
    }

    #[tokio::test]
    async fn test_submit_persists_both_turns_in_order() {
        let store = Arc::new(MemoryStore::default());
        let ctrl = controller(store.clone(), Script::Structured("Hi there"));

        let outcome = ctrl.submit("Hello", "gpt-5", "s1").await.unwrap();
        assert_eq!(outcome.user_message.content, "Hello");
        assert_eq!(outcome.assistant_message.content, "Hi there");

        let history = ctrl.history("s1").await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].role, MessageRole::User);
        assert_eq!(history[0].content, "Hello");
        assert_eq!(history[0].model, "gpt-5");
        assert_eq!(history[1].role, MessageRole::Assistant);
        assert_eq!(history[1].content, "Hi there");
        assert_eq!(history[1].model, "gpt-5");
        assert_eq!(ctrl.state("s1"), TurnState::Succeeded);
    }

    #[tokio::test]
    async fn test_gateway_failure_keeps_user_message_only() {
        let store = Arc::new(MemoryStore::default());
        let ctrl = controller(store.clone(), Script::Fail);

        let err = ctrl.submit("Hello", "gpt-5", "s1").await.unwrap_err();
        assert!(matches!(err, TurnError::Gateway(_)));

        let history = ctrl.history("s1").await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].role, MessageRole::User);
        assert_eq!(ctrl.state("s1"), TurnState::Failed);
    }

    #[tokio::test]
    async fn test_empty_reply_stores_fallback_literal() {
        let store = Arc::new(MemoryStore::default());
        let ctrl = controller(store.clone(), Script::Empty);

        let outcome = ctrl.submit("Hello", "gpt-5", "s1").await.unwrap();
        assert_eq!(outcome.assistant_message.content, NO_RESPONSE_FALLBACK);
    }

    #[tokio::test]
    async fn test_plain_reply_is_stored_verbatim() {
        let store = Arc::new(MemoryStore::default());
        let ctrl = controller(store.clone(), Script::Plain("plain answer"));

        let outcome = ctrl.submit("Hello", "gpt-5", "s1").await.unwrap();
        assert_eq!(outcome.assistant_message.content, "plain answer");
    }

    #[tokio::test]
    async fn test_whitespace_only_text_is_rejected_before_any_write() {
        let store = Arc::new(MemoryStore::default());
        let ctrl = controller(store.clone(), Script::Structured("Hi"));

        let err = ctrl.submit("   \n", "gpt-5", "s1").await.unwrap_err();
        assert!(matches!(err, TurnError::EmptyMessage));
        assert!(ctrl.history("s1").await.unwrap().is_empty());
        assert_eq!(ctrl.state("s1"), TurnState::Idle);
    }

    #[tokio::test]
    async fn test_concurrent_submit_for_same_session_is_busy() {
        let store = Arc::new(MemoryStore::default());
        let release = Arc::new(Notify::new());
        let ctrl = Arc::new(controller(
            store.clone(),
            Script::Slow(release.clone(), "late answer"),
        ));

        let first = {
            let ctrl = ctrl.clone();
            tokio::spawn(async move { ctrl.submit("Hello", "gpt-5", "s1").await })
        };

        // Wait for the first turn to reach the gateway.
        while ctrl.state("s1") != TurnState::Sending {
            tokio::task::yield_now().await;
        }

        let err = ctrl.submit("again", "gpt-5", "s1").await.unwrap_err();
        assert!(matches!(err, TurnError::Busy));

        // A different session is unaffected by s1's in-flight turn.
        assert_eq!(ctrl.state("s2"), TurnState::Idle);

        release.notify_one();
        let outcome = first.await.unwrap().unwrap();
        assert_eq!(outcome.assistant_message.content, "late answer");
        // Only the first submit's messages made it in.
        assert_eq!(ctrl.history("s1").await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_clear_does_not_cancel_in_flight_send() {
        let store = Arc::new(MemoryStore::default());
        let release = Arc::new(Notify::new());
        let ctrl = Arc::new(controller(
            store.clone(),
            Script::Slow(release.clone(), "late answer"),
        ));

        let pending = {
            let ctrl = ctrl.clone();
            tokio::spawn(async move { ctrl.submit("Hello", "gpt-5", "s1").await })
        };
        while ctrl.state("s1") != TurnState::Sending {
            tokio::task::yield_now().await;
        }

        ctrl.clear("s1").await.unwrap();
        release.notify_one();
        pending.await.unwrap().unwrap();

        // The late assistant message lands in the cleared session.
        let history = ctrl.history("s1").await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].role, MessageRole::Assistant);
    }

    #[tokio::test]
    async fn test_clear_is_idempotent() {
        let store = Arc::new(MemoryStore::default());
        let ctrl = controller(store.clone(), Script::Structured("Hi"));

        ctrl.submit("Hello", "gpt-5", "s1").await.unwrap();
        ctrl.clear("s1").await.unwrap();
        ctrl.clear("s1").await.unwrap();
        assert!(ctrl.history("s1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_sessions_are_isolated() {
        let store = Arc::new(MemoryStore::default());
        let ctrl = controller(store.clone(), Script::Structured("Hi"));

        ctrl.submit("from s1", "gpt-5", "s1").await.unwrap();
        ctrl.submit("from s2", "gpt-4o", "s2").await.unwrap();

        let s1 = ctrl.history("s1").await.unwrap();
        let s2 = ctrl.history("s2").await.unwrap();
        assert_eq!(s1.len(), 2);
        assert_eq!(s2.len(), 2);
        assert!(s1.iter().all(|m| m.session_id == "s1"));
        assert!(s2.iter().all(|m| m.model == "gpt-4o"));
    }

    #[tokio::test]
    async fn test_dropped_submit_releases_the_session() {
        let store = Arc::new(MemoryStore::default());
        let release = Arc::new(Notify::new());
        let ctrl = Arc::new(controller(
            store.clone(),
            Script::Slow(release.clone(), "never delivered"),
        ));

        let pending = {
            let ctrl = ctrl.clone();
            tokio::spawn(async move { ctrl.submit("Hello", "gpt-5", "s1").await })
        };
        while ctrl.state("s1") != TurnState::Sending {
            tokio::task::yield_now().await;
        }

        pending.abort();
        let _ = pending.await;

        assert_eq!(ctrl.state("s1"), TurnState::Idle);
    }
}
