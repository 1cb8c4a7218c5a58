//! Configuration loading for Parley.
//!
//! Reads `config.toml` from the data directory (`~/.parley/` by default)
//! and deserializes it into [`ParleyConfig`]. Falls back to sensible
//! defaults when the file is missing or malformed.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use parley_core::chat::models::DEFAULT_MODEL;

/// Which message store backs the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Per-session JSON files under the data directory.
    #[default]
    Local,
    /// The persistence service over HTTP.
    Server,
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backend::Local => write!(f, "local"),
            Backend::Server => write!(f, "server"),
        }
    }
}

impl FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Backend::Local),
            "server" => Ok(Backend::Server),
            other => Err(format!("invalid backend: '{other}' (expected local or server)")),
        }
    }
}

/// Gateway section of `config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Base URL of the hosted inference service.
    pub base_url: String,
    /// API token; `PUTER_API_TOKEN` in the environment takes precedence.
    pub token: Option<String>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.puter.com".to_string(),
            token: None,
        }
    }
}

/// Global configuration for the console and the persistence service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ParleyConfig {
    /// Store variant selected at startup.
    pub backend: Backend,
    /// Persistence service URL for the `server` backend (and the default
    /// bind target for `serve`).
    pub server_url: String,
    /// Model used when no preference has been stored yet.
    pub default_model: String,
    /// Token-limit hint forwarded to the gateway on every turn.
    pub max_tokens: u32,
    pub gateway: GatewayConfig,
}

impl Default for ParleyConfig {
    fn default() -> Self {
        Self {
            backend: Backend::Local,
            server_url: "http://127.0.0.1:8787".to_string(),
            default_model: DEFAULT_MODEL.to_string(),
            max_tokens: 1000,
            gateway: GatewayConfig::default(),
        }
    }
}

impl ParleyConfig {
    /// Resolve the gateway token: environment first, then config file.
    pub fn gateway_token(&self) -> Option<SecretString> {
        std::env::var("PUTER_API_TOKEN")
            .ok()
            .filter(|t| !t.is_empty())
            .or_else(|| self.gateway.token.clone())
            .map(SecretString::from)
    }
}

/// Resolve the data directory from `PARLEY_DATA_DIR`, falling back to
/// `~/.parley`.
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("PARLEY_DATA_DIR") {
        if !dir.is_empty() {
            return PathBuf::from(dir);
        }
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".parley")
}

/// Database URL for the persistence service's SQLite file.
pub fn database_url(data_dir: &Path) -> String {
    format!("sqlite://{}?mode=rwc", data_dir.join("parley.db").display())
}

/// Load configuration from `{data_dir}/config.toml`.
///
/// - If the file does not exist, returns [`ParleyConfig::default()`].
/// - If the file exists but fails to parse, logs a warning and returns the
///   default.
pub async fn load_config(data_dir: &Path) -> ParleyConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return ParleyConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return ParleyConfig::default();
        }
    };

    match toml::from_str::<ParleyConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            ParleyConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn load_config_missing_file_returns_default() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).await;
        assert_eq!(config.backend, Backend::Local);
        assert_eq!(config.default_model, DEFAULT_MODEL);
        assert_eq!(config.max_tokens, 1000);
    }

    #[tokio::test]
    async fn load_config_valid_toml_returns_parsed() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(
            tmp.path().join("config.toml"),
            r#"
backend = "server"
server_url = "http://10.0.0.5:9000"
max_tokens = 2000

[gateway]
base_url = "https://puter.example.com"
"#,
        )
        .await
        .unwrap();

        let config = load_config(tmp.path()).await;
        assert_eq!(config.backend, Backend::Server);
        assert_eq!(config.server_url, "http://10.0.0.5:9000");
        assert_eq!(config.max_tokens, 2000);
        assert_eq!(config.gateway.base_url, "https://puter.example.com");
        // Unset fields keep their defaults.
        assert_eq!(config.default_model, DEFAULT_MODEL);
    }

    #[tokio::test]
    async fn load_config_invalid_toml_returns_default() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(tmp.path().join("config.toml"), "this is not { valid toml !!!")
            .await
            .unwrap();

        let config = load_config(tmp.path()).await;
        assert_eq!(config.backend, Backend::Local);
    }

    #[test]
    fn backend_roundtrip() {
        for backend in [Backend::Local, Backend::Server] {
            let s = backend.to_string();
            let parsed: Backend = s.parse().unwrap();
            assert_eq!(backend, parsed);
        }
    }

    #[test]
    fn database_url_points_into_data_dir() {
        let url = database_url(Path::new("/tmp/parley-test"));
        assert!(url.starts_with("sqlite://"));
        assert!(url.contains("parley.db"));
    }
}
