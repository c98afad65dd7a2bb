//! Configuration management for the gateway
//!
//! Handles loading and validation of the YAML configuration file that
//! declares the listen address and the per-kind AI backends.

use crate::utils::error::{GatewayError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info};

/// Main configuration struct for the gateway
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// AI backends keyed by kind (`llm`, `tts`, `stt`, `image`)
    #[serde(default)]
    pub backends: HashMap<String, BackendConfig>,
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind host
    #[serde(default = "default_host")]
    pub host: String,

    /// Bind port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Maximum age of an unfinished audio session before eviction, seconds
    #[serde(default = "default_session_max_age")]
    pub session_max_age_secs: u64,

    /// Interval between stale-session sweeps, seconds
    #[serde(default = "default_session_sweep_interval")]
    pub session_sweep_interval_secs: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    12345
}

fn default_session_max_age() -> u64 {
    600
}

fn default_session_sweep_interval() -> u64 {
    60
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            session_max_age_secs: default_session_max_age(),
            session_sweep_interval_secs: default_session_sweep_interval(),
        }
    }
}

/// One configured AI backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Human-readable backend name
    pub name: String,

    /// Adapter type; currently only `openai` (OpenAI-compatible HTTP API)
    #[serde(rename = "type")]
    pub backend_type: String,

    /// Base URL of the provider API, e.g. `https://api.openai.com/v1`
    pub api_base: String,

    /// API key sent as a bearer token; empty disables the header
    #[serde(default)]
    pub api_key: String,

    /// Default model for this backend when the request does not name one
    #[serde(default)]
    pub model: Option<String>,
}

impl Config {
    /// Load configuration from a YAML file
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from: {:?}", path);

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| GatewayError::config(format!("Failed to read config file: {}", e)))?;

        let config: Config = serde_yaml::from_str(&content)
            .map_err(|e| GatewayError::config(format!("Failed to parse config: {}", e)))?;

        config.validate()?;

        debug!("Configuration loaded successfully");
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        for (kind, backend) in &self.backends {
            if !matches!(kind.as_str(), "llm" | "tts" | "stt" | "image") {
                return Err(GatewayError::config(format!(
                    "Unknown backend kind `{}` (expected llm, tts, stt or image)",
                    kind
                )));
            }
            if backend.name.is_empty() {
                return Err(GatewayError::config(format!("`name` not set for {}", kind)));
            }
            if backend.backend_type != "openai" {
                return Err(GatewayError::config(format!(
                    "Unsupported backend type `{}` for {}",
                    backend.backend_type, kind
                )));
            }
            if backend.api_base.is_empty() {
                return Err(GatewayError::config(format!(
                    "`api_base` not set for {}",
                    kind
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn loads_backends_from_yaml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
server:
  host: 127.0.0.1
  port: 9100
backends:
  stt:
    name: whisper-local
    type: openai
    api_base: http://localhost:8000/v1
    api_key: sk-test
"#
        )
        .unwrap();

        let config = Config::from_file(file.path()).await.unwrap();
        assert_eq!(config.server.port, 9100);
        assert_eq!(config.backends["stt"].name, "whisper-local");
        assert_eq!(config.backends["stt"].backend_type, "openai");
    }

    #[tokio::test]
    async fn rejects_unknown_backend_kind() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
backends:
  video:
    name: nope
    type: openai
    api_base: http://localhost/v1
"#
        )
        .unwrap();

        let err = Config::from_file(file.path()).await.unwrap_err();
        assert!(err.to_string().contains("Unknown backend kind"));
    }

    #[test]
    fn default_server_settings() {
        let config = Config::default();
        assert_eq!(config.server.port, 12345);
        assert_eq!(config.server.session_max_age_secs, 600);
        assert!(config.backends.is_empty());
    }
}
