//! # voxgate
//!
//! An AI gateway that re-exposes chat, image, text-to-speech and
//! speech-to-text backends behind one OpenAI-compatible HTTP surface.
//!
//! Its distinguishing feature is streaming speech-to-text for clients that
//! cannot upload a finished file: audio arrives as small frames over
//! repeated multipart POSTs or a WebSocket connection, keyed by a
//! caller-supplied session id. The [`core::audio`] module buffers those
//! frames, synthesizes a RIFF/WAVE header once the total length is known,
//! and hands a single well-formed audio stream to the transcription
//! backend.
//!
//! ```rust,no_run
//! use voxgate::config::Config;
//! use voxgate::server::HttpServer;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_file("config.yaml").await?;
//!     HttpServer::new(config)?.start().await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod core;
pub mod server;
pub mod utils;

pub use config::Config;
pub use server::HttpServer;
pub use utils::error::{GatewayError, Result};
