//! Application state and backend wiring.
//!
//! `AppState` holds the store used by the persistence service's HTTP
//! handlers. The console side instead assembles a [`BoxMessageStore`] from
//! the configured backend variant, so the controller never knows which
//! medium it is talking to.

use std::path::Path;
use std::sync::Arc;

use parley_core::chat::ConversationController;
use parley_core::gateway::BoxInferenceGateway;
use parley_core::store::BoxMessageStore;
use parley_infra::config::{database_url, Backend, ParleyConfig};
use parley_infra::gateway::puter::PuterGateway;
use parley_infra::http::message::HttpMessageStore;
use parley_infra::localfile::message::LocalFileMessageStore;
use parley_infra::sqlite::message::SqliteMessageStore;
use parley_infra::sqlite::pool::DatabasePool;

/// Shared state for the persistence service's HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<SqliteMessageStore>,
}

impl AppState {
    /// Initialize the service state: connect to the database under the
    /// data directory and wire the SQLite store.
    pub async fn init(data_dir: &Path) -> anyhow::Result<Self> {
        tokio::fs::create_dir_all(data_dir).await?;

        let pool = DatabasePool::new(&database_url(data_dir)).await?;
        Ok(Self {
            store: Arc::new(SqliteMessageStore::new(pool)),
        })
    }
}

/// Assemble the message store for the configured backend variant.
pub fn build_store(config: &ParleyConfig, data_dir: &Path) -> BoxMessageStore {
    match config.backend {
        Backend::Local => BoxMessageStore::new(LocalFileMessageStore::new(data_dir)),
        Backend::Server => BoxMessageStore::new(HttpMessageStore::new(&config.server_url)),
    }
}

/// Assemble the conversation controller for the console.
pub fn build_controller(config: &ParleyConfig, data_dir: &Path) -> ConversationController {
    let store = build_store(config, data_dir);
    let gateway = PuterGateway::new(config.gateway_token())
        .with_base_url(&config.gateway.base_url);
    ConversationController::new(
        store,
        BoxInferenceGateway::new(gateway),
        config.max_tokens,
    )
}
