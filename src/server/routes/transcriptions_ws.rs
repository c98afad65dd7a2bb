//! Streaming audio transcriptions over WebSocket
//!
//! Session context (id, mime, transcription parameters) arrives once as
//! query parameters on the upgrade request; each WebSocket text message then
//! carries one frame as `{"frame_index": n, "is_finish": 0|1, "data":
//! base64}`. On the finishing frame the session is assembled, dispatched to
//! the STT backend, and the transcribed text is written back on the same
//! connection before the read loop ends.

use crate::core::audio::types::TranscriptionRequest;
use crate::core::audio::{check_mime_valid, SessionStore};
use crate::core::backend::{Adapter, AdapterKind};
use crate::server::state::AppState;
use crate::utils::error::GatewayError;
use actix_web::{web, HttpRequest, HttpResponse, Result as ActixResult};
use actix_ws::Message;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use futures_util::StreamExt;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, error, info};

/// Connection-scoped session context from the upgrade query string
#[derive(Debug, Clone, Deserialize)]
pub struct WsSessionQuery {
    /// Filename forwarded to the backend
    #[serde(default)]
    file: String,
    /// Model forwarded to the backend
    #[serde(default)]
    model: String,
    /// Session id shared by every frame on this connection
    audio_id: String,
    /// Audio MIME describing the frames
    audio_mime: String,
    #[serde(default)]
    language: Option<String>,
    #[serde(default)]
    prompt: Option<String>,
}

/// Per-message frame envelope
#[derive(Debug, Deserialize)]
struct WsAudioFrame {
    frame_index: u32,
    #[serde(default)]
    is_finish: i32,
    #[serde(default)]
    data: String,
}

/// WebSocket transcription endpoint
pub async fn audio_transcriptions_ws(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: web::Payload,
    query: web::Query<WsSessionQuery>,
) -> ActixResult<HttpResponse> {
    let adapter = state.adapters.require(AdapterKind::Stt)?;

    let query = query.into_inner();
    if query.audio_id.is_empty() {
        return Err(GatewayError::BadRequest("`audio_id` is required".to_string()).into());
    }
    // Reject an unusable mime before upgrading rather than after buffering.
    if !check_mime_valid(&query.audio_mime) {
        return Err(GatewayError::BadRequest(format!(
            "unsupported audio_mime `{}`",
            query.audio_mime
        ))
        .into());
    }

    let (response, session, msg_stream) = actix_ws::handle(&req, body)?;

    info!(session = %query.audio_id, "websocket transcription started");
    actix_web::rt::spawn(read_loop(
        state.sessions.clone(),
        adapter,
        query,
        session,
        msg_stream,
    ));

    Ok(response)
}

async fn read_loop(
    store: Arc<SessionStore>,
    adapter: Arc<dyn Adapter>,
    query: WsSessionQuery,
    mut session: actix_ws::Session,
    mut msg_stream: actix_ws::MessageStream,
) {
    while let Some(Ok(msg)) = msg_stream.next().await {
        match msg {
            Message::Text(text) => {
                let frame: WsAudioFrame = match serde_json::from_str(&text) {
                    Ok(frame) => frame,
                    Err(e) => {
                        error!(session = %query.audio_id, "bad frame envelope: {}", e);
                        break;
                    }
                };

                let data = match BASE64.decode(frame.data.as_bytes()) {
                    Ok(data) => data,
                    Err(e) => {
                        error!(session = %query.audio_id, "bad frame base64: {}", e);
                        break;
                    }
                };

                debug!(
                    session = %query.audio_id,
                    frame_index = frame.frame_index,
                    "audio frame received"
                );
                store.add_frame(
                    &query.audio_id,
                    &query.audio_mime,
                    frame.frame_index,
                    data.into(),
                );

                if frame.is_finish == 1 {
                    finish(&store, &adapter, &query, &mut session).await;
                    break;
                }
            }
            Message::Ping(bytes) => {
                if session.pong(&bytes).await.is_err() {
                    break;
                }
            }
            Message::Close(_) => break,
            _ => {}
        }
    }

    let _ = session.close(None).await;
    info!(session = %query.audio_id, "websocket transcription closed");
}

/// Assemble the session, dispatch it, and reply with the transcription
/// text. The session is already evicted when dispatch runs; failures are
/// logged and end the connection without a reply.
async fn finish(
    store: &SessionStore,
    adapter: &Arc<dyn Adapter>,
    query: &WsSessionQuery,
    session: &mut actix_ws::Session,
) {
    let assembled = match store.finalize(&query.audio_id) {
        Ok(bytes) => bytes,
        Err(e) => {
            error!(session = %query.audio_id, "finalize failed: {}", e);
            return;
        }
    };

    info!(
        session = %query.audio_id,
        bytes = assembled.len(),
        backend = adapter.name(),
        "dispatching assembled audio"
    );

    let request = TranscriptionRequest {
        file: assembled,
        filename: query.file.clone(),
        model: query.model.clone(),
        language: query.language.clone(),
        prompt: query.prompt.clone(),
        ..Default::default()
    };

    match adapter.audio_transcriptions(request).await {
        Ok(response) => {
            debug!(session = %query.audio_id, text = %response.text, "transcribed");
            if let Err(e) = session.text(response.text).await {
                error!(session = %query.audio_id, "failed to write reply: {}", e);
            }
        }
        Err(e) => {
            error!(session = %query.audio_id, "transcription failed: {}", e);
        }
    }
}
