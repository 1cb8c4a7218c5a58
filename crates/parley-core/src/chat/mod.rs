//! Conversation orchestration.
//!
//! The controller owns turn-taking over a type-erased store and gateway;
//! `session` mints opaque session identifiers and `models` carries the
//! selectable model catalog.

pub mod controller;
pub mod models;
pub mod session;

pub use controller::{ConversationController, TurnError, TurnOutcome, TurnState};
