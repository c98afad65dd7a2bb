//! AI backend adapters
//!
//! A backend adapter wraps one provider API behind a uniform contract. The
//! gateway routes each endpoint to the adapter configured for that kind of
//! work (chat, TTS, STT, images); the adapters themselves are thin
//! pass-through clients.

mod openai;

pub use openai::OpenAiAdapter;

use crate::config::Config;
use crate::core::audio::types::{
    SpeechRequest, SpeechResponse, TranscriptionRequest, TranscriptionResponse,
};
use crate::utils::error::{GatewayError, Result};
use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::BoxStream;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

/// The kind of work a backend adapter serves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdapterKind {
    /// Chat / completion models
    Llm,
    /// Text-to-speech
    Tts,
    /// Speech-to-text
    Stt,
    /// Image generation
    Image,
}

impl AdapterKind {
    /// Parse a config key into an adapter kind
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "llm" => Some(Self::Llm),
            "tts" => Some(Self::Tts),
            "stt" => Some(Self::Stt),
            "image" => Some(Self::Image),
            _ => None,
        }
    }

    /// Stable lowercase name, matching the config keys
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Llm => "llm",
            Self::Tts => "tts",
            Self::Stt => "stt",
            Self::Image => "image",
        }
    }
}

impl std::fmt::Display for AdapterKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Uniform backend contract implemented by every provider adapter
#[async_trait]
pub trait Adapter: Send + Sync {
    /// Human-readable backend name from the configuration
    fn name(&self) -> &str;

    /// Non-streaming chat completion, relayed as raw JSON
    async fn chat_completions(&self, request: serde_json::Value) -> Result<serde_json::Value>;

    /// Streaming chat completion; yields the upstream SSE byte stream
    async fn chat_completions_stream(
        &self,
        request: serde_json::Value,
    ) -> Result<BoxStream<'static, Result<Bytes>>>;

    /// Image generation, relayed as raw JSON
    async fn images_generations(&self, request: serde_json::Value) -> Result<serde_json::Value>;

    /// Text-to-speech
    async fn audio_speech(&self, request: SpeechRequest) -> Result<SpeechResponse>;

    /// Speech-to-text over assembled audio bytes
    async fn audio_transcriptions(
        &self,
        request: TranscriptionRequest,
    ) -> Result<TranscriptionResponse>;

    /// Models exposed by this backend
    async fn models(&self) -> Result<Vec<serde_json::Value>>;
}

/// Registry of configured adapters, one slot per kind
#[derive(Default)]
pub struct AdapterService {
    adapters: HashMap<AdapterKind, Arc<dyn Adapter>>,
}

impl AdapterService {
    /// Build the registry from configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        let mut service = Self::default();
        for (key, backend) in &config.backends {
            let kind = AdapterKind::from_key(key).ok_or_else(|| {
                GatewayError::config(format!("Unknown backend kind `{}`", key))
            })?;

            let adapter: Arc<dyn Adapter> = match backend.backend_type.as_str() {
                "openai" => Arc::new(OpenAiAdapter::new(backend)?),
                other => {
                    return Err(GatewayError::config(format!(
                        "Unsupported backend type `{}` for {}",
                        other, kind
                    )))
                }
            };

            info!(backend = %backend.name, kind = %kind, "registered backend adapter");
            service.adapters.insert(kind, adapter);
        }
        Ok(service)
    }

    /// Register an adapter for a kind, replacing any existing one
    pub fn register(&mut self, kind: AdapterKind, adapter: Arc<dyn Adapter>) {
        self.adapters.insert(kind, adapter);
    }

    /// Adapter configured for `kind`, if any
    pub fn get(&self, kind: AdapterKind) -> Option<Arc<dyn Adapter>> {
        self.adapters.get(&kind).cloned()
    }

    /// Adapter for `kind`, or a gateway error naming the missing kind
    pub fn require(&self, kind: AdapterKind) -> Result<Arc<dyn Adapter>> {
        self.get(kind)
            .ok_or_else(|| GatewayError::internal(format!("No {} backend configured", kind)))
    }

    /// All registered (kind, adapter) pairs
    pub fn iter(&self) -> impl Iterator<Item = (AdapterKind, &Arc<dyn Adapter>)> {
        self.adapters.iter().map(|(kind, adapter)| (*kind, adapter))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_round_trips_config_keys() {
        for key in ["llm", "tts", "stt", "image"] {
            assert_eq!(AdapterKind::from_key(key).unwrap().as_str(), key);
        }
        assert!(AdapterKind::from_key("video").is_none());
    }

    #[test]
    fn require_names_the_missing_kind() {
        let service = AdapterService::default();
        let err = service.require(AdapterKind::Stt).err().unwrap();
        assert!(err.to_string().contains("stt"));
    }
}
