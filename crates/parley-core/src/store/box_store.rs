//! BoxMessageStore -- object-safe dynamic dispatch wrapper for MessageStore.
//!
//! The store variant (local file vs server-backed) is chosen from config at
//! startup, so the controller needs a type-erased handle:
//! 1. Define an object-safe `MessageStoreDyn` trait with boxed futures
//! 2. Blanket-impl `MessageStoreDyn` for all `T: MessageStore`
//! 3. `BoxMessageStore` wraps `Box<dyn MessageStoreDyn>` and delegates

use std::future::Future;
use std::pin::Pin;

use parley_types::error::StoreError;
use parley_types::message::{Message, NewMessage};

use super::message_store::MessageStore;

/// Object-safe version of [`MessageStore`] with boxed futures.
///
/// Exists solely to enable dynamic dispatch (`dyn MessageStoreDyn`).
/// A blanket implementation is provided for all types implementing
/// `MessageStore`.
pub trait MessageStoreDyn: Send + Sync {
    fn list_messages_boxed<'a>(
        &'a self,
        session_id: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<Message>, StoreError>> + Send + 'a>>;

    fn create_message_boxed<'a>(
        &'a self,
        new: &'a NewMessage,
    ) -> Pin<Box<dyn Future<Output = Result<Message, StoreError>> + Send + 'a>>;

    fn clear_session_boxed<'a>(
        &'a self,
        session_id: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<(), StoreError>> + Send + 'a>>;
}

/// Blanket implementation: any `MessageStore` automatically implements
/// `MessageStoreDyn`.
impl<T: MessageStore> MessageStoreDyn for T {
    fn list_messages_boxed<'a>(
        &'a self,
        session_id: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<Message>, StoreError>> + Send + 'a>> {
        Box::pin(self.list_messages(session_id))
    }

    fn create_message_boxed<'a>(
        &'a self,
        new: &'a NewMessage,
    ) -> Pin<Box<dyn Future<Output = Result<Message, StoreError>> + Send + 'a>> {
        Box::pin(self.create_message(new))
    }

    fn clear_session_boxed<'a>(
        &'a self,
        session_id: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<(), StoreError>> + Send + 'a>> {
        Box::pin(self.clear_session(session_id))
    }
}

/// Type-erased message store for runtime backend selection.
///
/// Since `MessageStore` uses RPITIT, it cannot be used as a trait object
/// directly. `BoxMessageStore` provides equivalent methods that delegate to
/// the inner `MessageStoreDyn` trait object.
pub struct BoxMessageStore {
    inner: Box<dyn MessageStoreDyn + Send + Sync>,
}

impl BoxMessageStore {
    /// Wrap a concrete `MessageStore` in a type-erased box.
    pub fn new<T: MessageStore + 'static>(store: T) -> Self {
        Self {
            inner: Box::new(store),
        }
    }

    /// All messages for a session, ordered by creation time ascending.
    pub async fn list_messages(&self, session_id: &str) -> Result<Vec<Message>, StoreError> {
        self.inner.list_messages_boxed(session_id).await
    }

    /// Validate, assign generated fields, and append a message.
    pub async fn create_message(&self, new: &NewMessage) -> Result<Message, StoreError> {
        self.inner.create_message_boxed(new).await
    }

    /// Remove every message for a session (idempotent).
    pub async fn clear_session(&self, session_id: &str) -> Result<(), StoreError> {
        self.inner.clear_session_boxed(session_id).await
    }
}
