//! HTTP route handlers, organized by endpoint

mod chat;
mod images;
mod models;
mod speech;
mod transcriptions;
mod transcriptions_ws;

pub use chat::chat_completions;
pub use images::images_generations;
pub use models::models;
pub use speech::{audio_speech, audio_speech_get};
pub use transcriptions::audio_transcriptions;
pub use transcriptions_ws::audio_transcriptions_ws;

use crate::server::state::AppState;
use actix_web::{web, HttpResponse};

/// Standard API response envelope
#[derive(Debug, Clone, serde::Serialize)]
pub struct ApiResponse<T> {
    /// Whether the request was successful
    pub success: bool,
    /// Response data (if successful)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Error message (if failed)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T>
where
    T: serde::Serialize,
{
    /// Create a successful response
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    /// Create an error response
    pub fn error(message: String) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            data: None,
            error: Some(message),
        }
    }
}

/// Liveness probe; reports the number of in-flight audio sessions.
pub async fn health(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "audio_sessions": state.sessions.len(),
    }))
}
