//! Local file preference store implementation.
//!
//! A single `prefs.json` document holding a flat string map. Lives beside
//! the session files but is independent of session lifecycle: clearing a
//! session never touches it.

use std::collections::BTreeMap;
use std::path::PathBuf;

use tokio::sync::Mutex;

use parley_core::store::prefs::PrefStore;
use parley_types::error::StoreError;

/// File-backed implementation of `PrefStore`.
pub struct LocalFilePrefStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl LocalFilePrefStore {
    /// Create a preference store rooted at the given data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            path: data_dir.into().join("prefs.json"),
            write_lock: Mutex::new(()),
        }
    }

    /// Read the preference map, recovering malformed or missing data as
    /// empty (same lenient policy as the session files).
    async fn read_map(&self) -> BTreeMap<String, String> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(_) => return BTreeMap::new(),
        };
        match serde_json::from_str(&content) {
            Ok(map) => map,
            Err(err) => {
                tracing::debug!(path = %self.path.display(), "malformed prefs dropped: {err}");
                BTreeMap::new()
            }
        }
    }
}

impl PrefStore for LocalFilePrefStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.read_map().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut map = self.read_map().await;
        map.insert(key.to_string(), value.to_string());

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StoreError::Storage(e.to_string()))?;
        }
        let json = serde_json::to_string(&map).map_err(|e| StoreError::Storage(e.to_string()))?;
        tokio::fs::write(&self.path, json)
            .await
            .map_err(|e| StoreError::Storage(e.to_string()))
    }
}
