//! In-flight audio session registry
//!
//! Frames for one chunked upload arrive across many independent requests or
//! WebSocket messages, identified only by a caller-supplied session id. The
//! store keeps those partial sessions in a sharded concurrent map so that
//! handlers for different ids never contend, while `add_frame` and
//! `finalize` for the same id are mutually exclusive. No network I/O ever
//! happens under a shard lock; dispatch runs strictly after finalize has
//! removed the session.

use bytes::Bytes;
use dashmap::DashMap;
use std::time::{Duration, Instant};
use tracing::{debug, info};

use super::container::synthesize_header;
use super::mime::parse_mime;
use super::AudioError;

/// One chunk of raw audio payload bytes tagged with its sequence index
#[derive(Debug, Clone)]
pub struct Frame {
    /// Caller-assigned sequence index
    pub index: u32,
    /// Raw payload bytes
    pub data: Bytes,
}

/// One chunked-audio upload in progress
#[derive(Debug)]
pub struct AudioSession {
    /// MIME string captured when the session was created (first write wins)
    pub mime: String,
    /// Frames in arrival order; sorted by index at assembly time
    pub frames: Vec<Frame>,
    /// Creation time, used by the stale sweep
    pub created_at: Instant,
}

impl AudioSession {
    fn new(mime: &str) -> Self {
        Self {
            mime: mime.to_string(),
            frames: Vec::new(),
            created_at: Instant::now(),
        }
    }
}

/// Registry of in-flight audio sessions, shared by all transport adapters
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: DashMap<String, AudioSession>,
}

impl SessionStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a frame to the session for `id`, creating the session on the
    /// first frame. A `mime` differing from the one captured at creation is
    /// ignored (first write wins).
    pub fn add_frame(&self, id: &str, mime: &str, index: u32, data: Bytes) {
        let mut session = self
            .sessions
            .entry(id.to_string())
            .or_insert_with(|| AudioSession::new(mime));
        session.frames.push(Frame { index, data });
    }

    /// Close the session for `id` and return its dispatch-ready bytes:
    /// a synthesized container header followed by the frame payloads in
    /// ascending index order.
    ///
    /// The session entry is removed atomically; of several racing callers
    /// exactly one succeeds and the rest observe [`AudioError::SessionNotFound`].
    /// Assembly happens after removal, outside any shard lock.
    pub fn finalize(&self, id: &str) -> Result<Vec<u8>, AudioError> {
        let (_, mut session) = self
            .sessions
            .remove(id)
            .ok_or_else(|| AudioError::SessionNotFound(id.to_string()))?;

        // Index order, not arrival order: reconstruction must be
        // deterministic even when transports deliver frames out of order.
        session.frames.sort_by_key(|frame| frame.index);

        let payload_len: usize = session.frames.iter().map(|frame| frame.data.len()).sum();
        let desc = parse_mime(&session.mime)?;
        let mut assembled = synthesize_header(&desc, payload_len)?;
        assembled.reserve(payload_len);
        for frame in &session.frames {
            assembled.extend_from_slice(&frame.data);
        }

        debug!(
            session = id,
            frames = session.frames.len(),
            bytes = assembled.len(),
            "audio session finalized"
        );
        Ok(assembled)
    }

    /// Drop sessions older than `max_age` and return how many were removed.
    ///
    /// Sessions whose finishing frame never arrives (dropped WebSocket,
    /// abandoned upload) are not an error; without this sweep they would
    /// accumulate for the life of the process.
    pub fn evict_stale(&self, max_age: Duration) -> usize {
        let before = self.sessions.len();
        self.sessions
            .retain(|_, session| session.created_at.elapsed() <= max_age);
        let evicted = before.saturating_sub(self.sessions.len());
        if evicted > 0 {
            info!(evicted, "evicted stale audio sessions");
        }
        evicted
    }

    /// Number of in-flight sessions
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Whether the store has no in-flight sessions
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
