//! BoxInferenceGateway -- object-safe dynamic dispatch wrapper.
//!
//! Same blanket-impl pattern as `BoxMessageStore`: an object-safe trait
//! with boxed futures, a blanket impl, and a thin delegating wrapper.

use std::future::Future;
use std::pin::Pin;

use parley_types::chat::{ChatTurn, GatewayReply};
use parley_types::error::GatewayError;

use super::provider::InferenceGateway;

/// Object-safe version of [`InferenceGateway`] with boxed futures.
pub trait InferenceGatewayDyn: Send + Sync {
    fn name(&self) -> &str;

    fn generate_boxed<'a>(
        &'a self,
        history: &'a [ChatTurn],
        model: &'a str,
        max_tokens: u32,
    ) -> Pin<Box<dyn Future<Output = Result<GatewayReply, GatewayError>> + Send + 'a>>;
}

/// Blanket implementation: any `InferenceGateway` automatically implements
/// `InferenceGatewayDyn`.
impl<T: InferenceGateway> InferenceGatewayDyn for T {
    fn name(&self) -> &str {
        InferenceGateway::name(self)
    }

    fn generate_boxed<'a>(
        &'a self,
        history: &'a [ChatTurn],
        model: &'a str,
        max_tokens: u32,
    ) -> Pin<Box<dyn Future<Output = Result<GatewayReply, GatewayError>> + Send + 'a>> {
        Box::pin(self.generate(history, model, max_tokens))
    }
}

/// Type-erased inference gateway.
pub struct BoxInferenceGateway {
    inner: Box<dyn InferenceGatewayDyn + Send + Sync>,
}

impl BoxInferenceGateway {
    /// Wrap a concrete `InferenceGateway` in a type-erased box.
    pub fn new<T: InferenceGateway + 'static>(gateway: T) -> Self {
        Self {
            inner: Box::new(gateway),
        }
    }

    /// Human-readable gateway name.
    pub fn name(&self) -> &str {
        self.inner.name()
    }

    /// Send the conversation history and receive the reply.
    pub async fn generate(
        &self,
        history: &[ChatTurn],
        model: &str,
        max_tokens: u32,
    ) -> Result<GatewayReply, GatewayError> {
        self.inner.generate_boxed(history, model, max_tokens).await
    }
}
