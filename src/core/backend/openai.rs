//! OpenAI-style backend adapter
//!
//! Thin reqwest client against any OpenAI-compatible API. Chat and image
//! calls are relayed as raw JSON; audio endpoints use the typed requests
//! from the audio module.

use super::Adapter;
use crate::config::BackendConfig;
use crate::core::audio::types::{
    SpeechRequest, SpeechResponse, TranscriptionRequest, TranscriptionResponse,
};
use crate::utils::error::{GatewayError, Result};
use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::BoxStream;
use futures::StreamExt;
use reqwest::multipart;

/// Adapter for OpenAI-compatible HTTP APIs
pub struct OpenAiAdapter {
    name: String,
    api_base: String,
    api_key: String,
    default_model: Option<String>,
    client: reqwest::Client,
}

impl OpenAiAdapter {
    /// Build an adapter from one backend config entry
    pub fn new(config: &BackendConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(GatewayError::HttpClient)?;

        Ok(Self {
            name: config.name.clone(),
            api_base: config.api_base.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            default_model: config.model.clone(),
            client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_base, path)
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let mut builder = self.client.request(method, self.url(path));
        if !self.api_key.is_empty() {
            builder = builder.bearer_auth(&self.api_key);
        }
        builder
    }

    /// Fill in the configured default model when the caller named none
    fn apply_default_model(&self, request: &mut serde_json::Value) {
        let Some(default) = &self.default_model else {
            return;
        };
        let Some(object) = request.as_object_mut() else {
            return;
        };
        let missing = object
            .get("model")
            .and_then(|model| model.as_str())
            .map(str::is_empty)
            .unwrap_or(true);
        if missing {
            object.insert(
                "model".to_string(),
                serde_json::Value::String(default.clone()),
            );
        }
    }

    fn set_stream_flag(request: &mut serde_json::Value, stream: bool) {
        if let Some(object) = request.as_object_mut() {
            object.insert("stream".to_string(), serde_json::Value::Bool(stream));
        }
    }

    async fn relay_json(&self, path: &str, body: serde_json::Value) -> Result<serde_json::Value> {
        let response = self
            .request(reqwest::Method::POST, path)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            return Err(GatewayError::backend(format!(
                "{} returned {}: {}",
                self.name, status, detail
            )));
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl Adapter for OpenAiAdapter {
    fn name(&self) -> &str {
        &self.name
    }

    async fn chat_completions(&self, mut request: serde_json::Value) -> Result<serde_json::Value> {
        self.apply_default_model(&mut request);
        Self::set_stream_flag(&mut request, false);
        self.relay_json("/chat/completions", request).await
    }

    async fn chat_completions_stream(
        &self,
        mut request: serde_json::Value,
    ) -> Result<BoxStream<'static, Result<Bytes>>> {
        self.apply_default_model(&mut request);
        Self::set_stream_flag(&mut request, true);

        let response = self
            .request(reqwest::Method::POST, "/chat/completions")
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            return Err(GatewayError::backend(format!(
                "{} returned {}: {}",
                self.name, status, detail
            )));
        }

        let stream = response
            .bytes_stream()
            .map(|chunk| chunk.map_err(GatewayError::HttpClient));
        Ok(stream.boxed())
    }

    async fn images_generations(&self, mut request: serde_json::Value) -> Result<serde_json::Value> {
        self.apply_default_model(&mut request);
        self.relay_json("/images/generations", request).await
    }

    async fn audio_speech(&self, mut request: SpeechRequest) -> Result<SpeechResponse> {
        if request.model.is_empty() {
            if let Some(default) = &self.default_model {
                request.model = default.clone();
            }
        }

        let response = self
            .request(reqwest::Method::POST, "/audio/speech")
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            return Err(GatewayError::backend(format!(
                "{} returned {}: {}",
                self.name, status, detail
            )));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("audio/mpeg")
            .to_string();
        let audio = response.bytes().await?.to_vec();

        Ok(SpeechResponse {
            audio,
            content_type,
        })
    }

    async fn audio_transcriptions(
        &self,
        mut request: TranscriptionRequest,
    ) -> Result<TranscriptionResponse> {
        if request.model.is_empty() {
            if let Some(default) = &self.default_model {
                request.model = default.clone();
            }
        }

        let filename = if request.filename.is_empty() {
            "audio.wav".to_string()
        } else {
            request.filename.clone()
        };

        let file_part = multipart::Part::bytes(request.file)
            .file_name(filename)
            .mime_str("application/octet-stream")
            .map_err(|e| GatewayError::BadRequest(format!("Invalid MIME type: {}", e)))?;

        let mut form = multipart::Form::new()
            .part("file", file_part)
            .text("model", request.model);

        if let Some(language) = request.language {
            form = form.text("language", language);
        }
        if let Some(prompt) = request.prompt {
            form = form.text("prompt", prompt);
        }
        if let Some(response_format) = request.response_format {
            form = form.text("response_format", response_format);
        }
        if let Some(temperature) = request.temperature {
            form = form.text("temperature", temperature.to_string());
        }
        if let Some(granularities) = request.timestamp_granularities {
            for granularity in granularities {
                form = form.text("timestamp_granularities[]", granularity);
            }
        }

        let response = self
            .request(reqwest::Method::POST, "/audio/transcriptions")
            .multipart(form)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            return Err(GatewayError::backend(format!(
                "{} returned {}: {}",
                self.name, status, detail
            )));
        }

        Ok(response.json().await?)
    }

    async fn models(&self) -> Result<Vec<serde_json::Value>> {
        let response = self.request(reqwest::Method::GET, "/models").send().await?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(GatewayError::backend(format!(
                "{} returned {} listing models",
                self.name, status
            )));
        }

        let body: serde_json::Value = response.json().await?;
        let models = body
            .get("data")
            .and_then(|data| data.as_array())
            .cloned()
            .unwrap_or_default();
        Ok(models)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn adapter_for(server: &MockServer) -> OpenAiAdapter {
        OpenAiAdapter::new(&BackendConfig {
            name: "test-backend".to_string(),
            backend_type: "openai".to_string(),
            api_base: server.uri(),
            api_key: "sk-test".to_string(),
            model: Some("whisper-1".to_string()),
        })
        .unwrap()
    }

    #[tokio::test]
    async fn transcription_round_trip() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/audio/transcriptions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "text": "hello world",
                "language": "en",
                "duration": 1.5
            })))
            .mount(&server)
            .await;

        let adapter = adapter_for(&server);
        let response = adapter
            .audio_transcriptions(TranscriptionRequest {
                file: vec![0u8; 64],
                filename: "clip.wav".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(response.text, "hello world");
        assert_eq!(response.language.as_deref(), Some("en"));
    }

    #[tokio::test]
    async fn backend_failure_is_surfaced() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/audio/transcriptions"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let adapter = adapter_for(&server);
        let err = adapter
            .audio_transcriptions(TranscriptionRequest::default())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("test-backend"));
    }

    #[tokio::test]
    async fn chat_fills_default_model() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{"message": {"role": "assistant", "content": "hi"}}]
            })))
            .mount(&server)
            .await;

        let adapter = adapter_for(&server);
        let response = adapter
            .chat_completions(serde_json::json!({"messages": []}))
            .await
            .unwrap();
        assert!(response["choices"].is_array());
    }
}
