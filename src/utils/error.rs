//! Error handling for the gateway
//!
//! This module defines all error types used throughout the gateway.

use crate::core::audio::AudioError;
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

/// Result type alias for the gateway
pub type Result<T> = std::result::Result<T, GatewayError>;

/// Main error type for the gateway
#[derive(Error, Debug)]
pub enum GatewayError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// HTTP client errors
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Audio pipeline errors
    #[error(transparent)]
    Audio(#[from] AudioError),

    /// Bad request errors
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Not found errors
    #[error("Not found: {0}")]
    NotFound(String),

    /// Upstream backend failures, relayed opaquely
    #[error("Backend error: {0}")]
    Backend(String),

    /// Internal server errors
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ResponseError for GatewayError {
    fn error_response(&self) -> HttpResponse {
        let (status_code, error_code, message) = match self {
            GatewayError::Config(_) => (
                actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
                "CONFIG_ERROR",
                self.to_string(),
            ),
            GatewayError::HttpClient(_) => (
                actix_web::http::StatusCode::BAD_GATEWAY,
                "UPSTREAM_ERROR",
                self.to_string(),
            ),
            GatewayError::Serialization(_) => (
                actix_web::http::StatusCode::BAD_REQUEST,
                "SERIALIZATION_ERROR",
                self.to_string(),
            ),
            GatewayError::Io(_) => (
                actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
                "IO_ERROR",
                self.to_string(),
            ),
            GatewayError::Audio(audio_error) => match audio_error {
                AudioError::UnsupportedMime(_) => (
                    actix_web::http::StatusCode::BAD_REQUEST,
                    "UNSUPPORTED_MIME",
                    audio_error.to_string(),
                ),
                AudioError::UnsupportedContainer(_) => (
                    actix_web::http::StatusCode::BAD_REQUEST,
                    "UNSUPPORTED_CONTAINER",
                    audio_error.to_string(),
                ),
                AudioError::MalformedChunk(_) => (
                    actix_web::http::StatusCode::BAD_REQUEST,
                    "MALFORMED_CHUNK",
                    audio_error.to_string(),
                ),
                // A missing session on finalize is a race or caller bug,
                // surfaced loudly rather than swallowed.
                AudioError::SessionNotFound(_) => (
                    actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
                    "SESSION_NOT_FOUND",
                    audio_error.to_string(),
                ),
            },
            GatewayError::BadRequest(_) => (
                actix_web::http::StatusCode::BAD_REQUEST,
                "BAD_REQUEST",
                self.to_string(),
            ),
            GatewayError::NotFound(_) => (
                actix_web::http::StatusCode::NOT_FOUND,
                "NOT_FOUND",
                self.to_string(),
            ),
            GatewayError::Backend(_) => (
                actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
                "BACKEND_ERROR",
                self.to_string(),
            ),
            GatewayError::Internal(_) => (
                actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                self.to_string(),
            ),
        };

        HttpResponse::build(status_code).json(serde_json::json!({
            "error": {
                "code": error_code,
                "message": message,
            }
        }))
    }
}

impl GatewayError {
    /// Helper for config errors
    pub fn config<S: Into<String>>(msg: S) -> Self {
        GatewayError::Config(msg.into())
    }

    /// Helper for internal server errors
    pub fn internal<S: Into<String>>(msg: S) -> Self {
        GatewayError::Internal(msg.into())
    }

    /// Helper for upstream backend failures
    pub fn backend<S: Into<String>>(msg: S) -> Self {
        GatewayError::Backend(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn audio_errors_map_to_client_or_server_status() {
        let bad_mime: GatewayError = AudioError::UnsupportedMime("video/mp4".into()).into();
        assert_eq!(bad_mime.error_response().status().as_u16(), 400);

        let lost: GatewayError = AudioError::SessionNotFound("abc".into()).into();
        assert_eq!(lost.error_response().status().as_u16(), 500);
    }
}
