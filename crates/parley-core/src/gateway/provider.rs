//! InferenceGateway trait definition.
//!
//! The hosted AI service is opaque: the call may take arbitrary latency,
//! imposes no timeout of its own, and answers in one of the shapes
//! captured by [`GatewayReply`]. Callers needing a deadline must impose
//! an application-level timeout around the call.

use parley_types::chat::{ChatTurn, GatewayReply};
use parley_types::error::GatewayError;

/// Trait for hosted inference backends.
///
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
/// Implementations live in parley-infra (e.g., `PuterGateway`).
pub trait InferenceGateway: Send + Sync {
    /// Human-readable gateway name (e.g., "puter").
    fn name(&self) -> &str;

    /// Send the conversation history and receive the reply.
    ///
    /// `max_tokens` is a hint forwarded to the service, not a guarantee.
    fn generate(
        &self,
        history: &[ChatTurn],
        model: &str,
        max_tokens: u32,
    ) -> impl std::future::Future<Output = Result<GatewayReply, GatewayError>> + Send;
}
