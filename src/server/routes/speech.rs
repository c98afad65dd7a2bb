//! Audio speech endpoint (text-to-speech)
//!
//! POST takes an OpenAI-style JSON body. GET is kept for browser callers
//! that pass `input`, `voice`, `speed` and `response_format` as query
//! parameters.

use crate::core::audio::types::SpeechRequest;
use crate::core::backend::AdapterKind;
use crate::server::routes::ApiResponse;
use crate::server::state::AppState;
use actix_web::{web, HttpResponse, Result as ActixResult};
use serde::Deserialize;
use tracing::info;

/// Audio speech endpoint (JSON body)
pub async fn audio_speech(
    state: web::Data<AppState>,
    request: web::Json<SpeechRequest>,
) -> ActixResult<HttpResponse> {
    speak(&state, request.into_inner()).await
}

/// Query parameters for the GET speech variant
#[derive(Debug, Deserialize)]
pub struct SpeechQuery {
    input: Option<String>,
    voice: Option<String>,
    response_format: Option<String>,
    speed: Option<String>,
}

/// Audio speech endpoint (query parameters)
pub async fn audio_speech_get(
    state: web::Data<AppState>,
    query: web::Query<SpeechQuery>,
) -> ActixResult<HttpResponse> {
    let query = query.into_inner();
    let input = query
        .input
        .as_deref()
        .map(str::trim)
        .unwrap_or_default()
        .to_string();
    if input.is_empty() {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::<()>::error("`input` is required".to_string())));
    }

    let request = SpeechRequest {
        input,
        model: String::new(),
        voice: query.voice.unwrap_or_default().trim().to_string(),
        response_format: query
            .response_format
            .map(|format| format.trim().to_string())
            .filter(|format| !format.is_empty()),
        speed: query.speed.and_then(|speed| speed.trim().parse().ok()),
    };

    speak(&state, request).await
}

async fn speak(state: &AppState, request: SpeechRequest) -> ActixResult<HttpResponse> {
    let adapter = state.adapters.require(AdapterKind::Tts)?;
    info!(
        backend = adapter.name(),
        text_len = request.input.len(),
        "speech request"
    );

    let response = adapter.audio_speech(request).await?;
    Ok(HttpResponse::Ok()
        .content_type(response.content_type)
        .body(response.audio))
}
