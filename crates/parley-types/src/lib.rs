//! Shared domain types for Parley.
//!
//! This crate contains the types used across the Parley workspace:
//! Message, the chat wire schemas, the gateway reply union, and their
//! associated error types.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod chat;
pub mod error;
pub mod message;
