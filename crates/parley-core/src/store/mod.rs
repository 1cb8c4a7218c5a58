//! Message store ports.
//!
//! The `MessageStore` contract holds identically for every backing medium;
//! the conversation controller takes a [`BoxMessageStore`] so the variant
//! is selected at startup, not by type.

pub mod box_store;
pub mod message_store;
pub mod prefs;

pub use box_store::BoxMessageStore;
pub use message_store::MessageStore;
pub use prefs::PrefStore;
