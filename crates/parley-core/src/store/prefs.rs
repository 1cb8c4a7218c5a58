//! Preference store trait.
//!
//! Holds process-wide key-value preferences -- currently just the last
//! selected model. Deliberately outside the message store's invariants:
//! the preference is global, init-on-load, write-on-change, and survives
//! session clears.

use parley_types::error::StoreError;

/// Key under which the last selected model is persisted.
pub const SELECTED_MODEL_KEY: &str = "selectedModel";

/// Trait for global persistent preferences.
///
/// Uses RPITIT (native async fn in traits, Rust 2024 edition).
/// Implementations live in parley-infra.
pub trait PrefStore: Send + Sync {
    /// Get a value by key. Returns None if the key does not exist.
    fn get(
        &self,
        key: &str,
    ) -> impl std::future::Future<Output = Result<Option<String>, StoreError>> + Send;

    /// Set a value for a key (upsert).
    fn set(
        &self,
        key: &str,
        value: &str,
    ) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;
}
