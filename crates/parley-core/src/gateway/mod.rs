//! Inference gateway port.
//!
//! A single external function boundary: given an ordered (role, content)
//! history, a model identifier, and a token-limit hint, produce generated
//! text or fail. Streaming, retries, and timeouts are out of scope here.

pub mod box_gateway;
pub mod provider;

pub use box_gateway::BoxInferenceGateway;
pub use provider::InferenceGateway;
