//! Container header synthesis
//!
//! Once a session's full payload length is known, a container header is
//! synthesized so the assembled bytes form a stream any RIFF/WAVE consumer
//! can read. PCM gets the canonical 44-byte WAVE header. Ogg and MP3 get
//! only their magic bytes (`OggS`, `ID3`). Those are not structurally valid
//! containers; they are kept as-is for compatibility with downstream
//! consumers that already tolerate them.

use super::mime::{parse_mime, ContainerFamily, MimeDescriptor};
use super::AudioError;

/// Synthesize the container header for `payload_len` bytes of audio.
pub fn synthesize_header(
    desc: &MimeDescriptor,
    payload_len: usize,
) -> Result<Vec<u8>, AudioError> {
    match desc.family {
        ContainerFamily::PcmRiff => Ok(riff_header(desc, payload_len)),
        ContainerFamily::Ogg => Ok(b"OggS".to_vec()),
        ContainerFamily::Mp3 => Ok(b"ID3".to_vec()),
    }
}

/// Canonical 44-byte RIFF/WAVE header: mono linear PCM, all multi-byte
/// integers little-endian.
fn riff_header(desc: &MimeDescriptor, payload_len: usize) -> Vec<u8> {
    let block_align = desc.bits_per_sample / 8;
    let byte_rate = desc.sample_rate * u32::from(block_align);
    let data_len = payload_len as u32;

    let mut header = Vec::with_capacity(44);
    header.extend_from_slice(b"RIFF");
    header.extend_from_slice(&(36 + data_len).to_le_bytes());
    header.extend_from_slice(b"WAVE");

    header.extend_from_slice(b"fmt ");
    header.extend_from_slice(&16u32.to_le_bytes());
    header.extend_from_slice(&1u16.to_le_bytes()); // linear PCM
    header.extend_from_slice(&1u16.to_le_bytes()); // mono
    header.extend_from_slice(&desc.sample_rate.to_le_bytes());
    header.extend_from_slice(&byte_rate.to_le_bytes());
    header.extend_from_slice(&block_align.to_le_bytes());
    header.extend_from_slice(&desc.bits_per_sample.to_le_bytes());

    header.extend_from_slice(b"data");
    header.extend_from_slice(&data_len.to_le_bytes());

    header
}

/// Operational mime validity check used at the transport boundary: a mime
/// is accepted iff a header can be synthesized for an empty payload.
pub fn check_mime_valid(mime: &str) -> bool {
    parse_mime(mime)
        .and_then(|desc| synthesize_header(&desc, 0))
        .is_ok()
}
