//! Chat completions endpoint
//!
//! OpenAI-compatible passthrough to the configured LLM backend, streaming
//! and non-streaming.

use crate::core::backend::AdapterKind;
use crate::server::state::AppState;
use actix_web::http::header::{CACHE_CONTROL, CONTENT_TYPE};
use actix_web::{web, HttpResponse, Result as ActixResult};
use tracing::info;

/// Chat completions endpoint
pub async fn chat_completions(
    state: web::Data<AppState>,
    request: web::Json<serde_json::Value>,
) -> ActixResult<HttpResponse> {
    let adapter = state.adapters.require(AdapterKind::Llm)?;

    let request = request.into_inner();
    let stream = request
        .get("stream")
        .and_then(|value| value.as_bool())
        .unwrap_or(false);

    info!(backend = adapter.name(), stream, "chat completion request");

    if stream {
        let sse = adapter.chat_completions_stream(request).await?;
        Ok(HttpResponse::Ok()
            .insert_header((CONTENT_TYPE, "text/event-stream"))
            .insert_header((CACHE_CONTROL, "no-cache"))
            .streaming(sse))
    } else {
        let response = adapter.chat_completions(request).await?;
        Ok(HttpResponse::Ok().json(response))
    }
}
