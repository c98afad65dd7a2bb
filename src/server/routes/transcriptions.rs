//! Audio transcriptions endpoint
//!
//! OpenAI-compatible multipart speech-to-text. Two shapes share this route:
//! a whole audio file posted once, or, when the `is_frame` field is
//! present, one frame of a chunked upload identified by `audio_id`. Frames
//! are buffered in the session store; the request carrying `is_finish=1`
//! triggers assembly and dispatch to the STT backend.

use crate::core::audio::types::TranscriptionRequest;
use crate::core::audio::{check_mime_valid, AudioError};
use crate::core::backend::{Adapter, AdapterKind};
use crate::server::routes::ApiResponse;
use crate::server::state::AppState;
use crate::utils::error::GatewayError;
use actix_multipart::Multipart;
use actix_web::{web, HttpResponse, Result as ActixResult};
use bytes::Bytes;
use futures::StreamExt;
use std::sync::Arc;
use tracing::{debug, error, info};

/// Parsed multipart form, before validation
#[derive(Default)]
struct TranscriptionForm {
    file: Option<Vec<u8>>,
    filename: String,
    model: Option<String>,
    language: Option<String>,
    prompt: Option<String>,
    temperature: Option<f32>,
    response_format: Option<String>,
    timestamp_granularities: Vec<String>,
    is_frame: bool,
    audio_id: Option<String>,
    audio_mime: Option<String>,
    frame_index: Option<String>,
    is_finish: Option<String>,
}

async fn read_field_bytes(field: &mut actix_multipart::Field) -> Result<Vec<u8>, HttpResponse> {
    let mut data = Vec::new();
    while let Some(chunk) = field.next().await {
        match chunk {
            Ok(bytes) => data.extend_from_slice(&bytes),
            Err(e) => {
                error!("Error reading multipart chunk: {}", e);
                return Err(HttpResponse::BadRequest()
                    .json(ApiResponse::<()>::error("Error reading field".to_string())));
            }
        }
    }
    Ok(data)
}

async fn read_field_text(field: &mut actix_multipart::Field) -> Result<String, HttpResponse> {
    let bytes = read_field_bytes(field).await?;
    Ok(String::from_utf8_lossy(&bytes).to_string())
}

async fn parse_form(mut payload: Multipart) -> Result<TranscriptionForm, HttpResponse> {
    let mut form = TranscriptionForm {
        filename: "audio.wav".to_string(),
        ..Default::default()
    };

    while let Some(item) = payload.next().await {
        let mut field = match item {
            Ok(f) => f,
            Err(e) => {
                error!("Error reading multipart field: {}", e);
                return Err(HttpResponse::BadRequest().json(ApiResponse::<()>::error(format!(
                    "Invalid multipart data: {}",
                    e
                ))));
            }
        };

        let field_name = match field.name() {
            Some(name) => name.to_string(),
            None => continue,
        };

        match field_name.as_str() {
            "file" => {
                if let Some(cd) = field.content_disposition() {
                    if let Some(fname) = cd.get_filename() {
                        form.filename = fname.to_string();
                    }
                }
                form.file = Some(read_field_bytes(&mut field).await?);
            }
            "model" => form.model = Some(read_field_text(&mut field).await?),
            "language" => form.language = Some(read_field_text(&mut field).await?),
            "prompt" => form.prompt = Some(read_field_text(&mut field).await?),
            "temperature" => {
                form.temperature = read_field_text(&mut field).await?.parse().ok();
            }
            "response_format" => {
                form.response_format = Some(read_field_text(&mut field).await?);
            }
            "timestamp_granularities[]" => {
                let granularity = read_field_text(&mut field).await?;
                form.timestamp_granularities.push(granularity);
            }
            "is_frame" => {
                let _ = read_field_bytes(&mut field).await?;
                form.is_frame = true;
            }
            "audio_id" => form.audio_id = Some(read_field_text(&mut field).await?),
            "audio_mime" => form.audio_mime = Some(read_field_text(&mut field).await?),
            "frame_index" => form.frame_index = Some(read_field_text(&mut field).await?),
            "is_finish" => form.is_finish = Some(read_field_text(&mut field).await?),
            _ => {
                // Drain and skip unknown fields
                while field.next().await.is_some() {}
            }
        }
    }

    Ok(form)
}

impl TranscriptionForm {
    fn into_request(self, file: Vec<u8>) -> TranscriptionRequest {
        TranscriptionRequest {
            file,
            filename: self.filename,
            model: self.model.unwrap_or_default(),
            language: self.language,
            prompt: self.prompt,
            response_format: self.response_format,
            temperature: self.temperature,
            timestamp_granularities: if self.timestamp_granularities.is_empty() {
                None
            } else {
                Some(self.timestamp_granularities)
            },
        }
    }
}

/// Audio transcriptions endpoint
pub async fn audio_transcriptions(
    state: web::Data<AppState>,
    payload: Multipart,
) -> ActixResult<HttpResponse> {
    let adapter = state.adapters.require(AdapterKind::Stt)?;

    let mut form = match parse_form(payload).await {
        Ok(form) => form,
        Err(response) => return Ok(response),
    };

    let Some(file) = form.file.take() else {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::<()>::error("`file` is required".to_string())));
    };

    if form.is_frame {
        return frame_request(&state, adapter, form, file).await;
    }

    info!(
        backend = adapter.name(),
        filename = %form.filename,
        bytes = file.len(),
        "transcription request"
    );

    let response = adapter.audio_transcriptions(form.into_request(file)).await?;
    Ok(HttpResponse::Ok().json(response))
}

/// Handle one frame of a chunked upload. All field validation happens
/// before any session mutation, so a rejected chunk can be retried as-is.
async fn frame_request(
    state: &AppState,
    adapter: Arc<dyn Adapter>,
    mut form: TranscriptionForm,
    file: Vec<u8>,
) -> ActixResult<HttpResponse> {
    let audio_id = match form.audio_id.take() {
        Some(id) if !id.is_empty() => id,
        _ => return Err(malformed("`audio_id` is required")),
    };
    let audio_mime = match form.audio_mime.take() {
        Some(mime) => mime,
        None => return Err(malformed("`audio_mime` is required")),
    };
    if !check_mime_valid(&audio_mime) {
        return Err(malformed(&format!(
            "unsupported audio_mime `{}`",
            audio_mime
        )));
    }
    let frame_index: u32 = match form.frame_index.as_deref().map(str::parse) {
        Some(Ok(index)) => index,
        Some(Err(_)) => return Err(malformed("`frame_index` must be a non-negative integer")),
        None => return Err(malformed("`frame_index` is required")),
    };
    let is_finish = match form.is_finish.as_deref() {
        Some(value) => value == "1",
        None => return Err(malformed("`is_finish` is required")),
    };

    debug!(
        session = %audio_id,
        frame_index, is_finish, "audio frame received"
    );

    state
        .sessions
        .add_frame(&audio_id, &audio_mime, frame_index, Bytes::from(file));

    if !is_finish {
        return Ok(HttpResponse::Ok().json(ApiResponse::success(serde_json::json!({
            "audio_id": audio_id,
            "frame_index": frame_index,
        }))));
    }

    // The session is evicted here whatever happens next; a backend failure
    // does not re-buffer the frames.
    let assembled = state.sessions.finalize(&audio_id).map_err(GatewayError::from)?;

    if form.language.is_none() {
        form.language = Some("zh".to_string());
    }

    info!(
        backend = adapter.name(),
        session = %audio_id,
        bytes = assembled.len(),
        "dispatching assembled audio"
    );

    let response = adapter
        .audio_transcriptions(form.into_request(assembled))
        .await?;
    Ok(HttpResponse::Ok().json(response))
}

fn malformed(message: &str) -> actix_web::Error {
    GatewayError::from(AudioError::MalformedChunk(message.to_string())).into()
}
