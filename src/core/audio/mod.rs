//! Chunked-audio reassembly and container synthesis
//!
//! Streaming speech-to-text clients deliver audio in small frames, either as
//! repeated multipart uploads or as WebSocket messages. This module buffers
//! those frames per caller-supplied session id, and on the finishing frame
//! assembles them into a single well-formed audio stream: a synthesized
//! container header followed by the concatenated payload, ready to hand to a
//! transcription backend.

mod container;
mod mime;
mod session;
mod tests;
pub mod types;

pub use container::{check_mime_valid, synthesize_header};
pub use mime::{parse_mime, ContainerFamily, MimeDescriptor};
pub use session::{AudioSession, Frame, SessionStore};

use thiserror::Error;

/// Errors produced by the audio pipeline
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AudioError {
    /// The MIME string does not describe a supported audio container
    #[error("Unsupported audio mime: {0}")]
    UnsupportedMime(String),

    /// The container family cannot be synthesized
    #[error("Unsupported audio container: {0}")]
    UnsupportedContainer(String),

    /// Finalize was called for an id with no in-flight session
    #[error("Audio session not found: {0}")]
    SessionNotFound(String),

    /// A transport chunk was missing a field or carried an invalid value
    #[error("Malformed audio chunk: {0}")]
    MalformedChunk(String),
}
