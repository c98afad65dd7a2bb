//! MIME descriptor parsing
//!
//! Classifies a loosely structured content-type string such as
//! `audio/L16;rate=8000` into the container family and PCM parameters needed
//! to synthesize a header. The grammar is `type/subtype[;key=value]*` with
//! two recognized parameters: `rate` and `format`.

use super::AudioError;

/// Audio container family resolved from the MIME base type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerFamily {
    /// Raw PCM wrapped in a RIFF/WAVE header
    PcmRiff,
    /// Ogg stream (opus included)
    Ogg,
    /// MP3 stream
    Mp3,
}

/// Parsed view of an audio MIME string, never persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MimeDescriptor {
    /// Container family
    pub family: ContainerFamily,
    /// Sample rate in Hz; meaningful for `PcmRiff` only
    pub sample_rate: u32,
    /// Bits per sample; meaningful for `PcmRiff` only
    pub bits_per_sample: u16,
}

/// Map a format token to its PCM bit depth; 0 means unknown.
fn match_format(value: &str) -> u16 {
    match value {
        "S16LE" | "L16" => 16,
        "S8" => 8,
        _ => 0,
    }
}

/// Parse an audio MIME string into a [`MimeDescriptor`].
///
/// The bit depth comes from the `format` parameter when present, otherwise
/// it is inferred from the subtype token (`audio/L16` implies 16-bit).
/// PCM families require a positive sample rate and bit depth; Ogg and MP3
/// only need the family to resolve since their headers carry no parameters.
pub fn parse_mime(mime: &str) -> Result<MimeDescriptor, AudioError> {
    let mut parts = mime.split(';');
    let base = parts.next().unwrap_or_default().trim();

    let family = match base {
        "audio/L16" | "audio/x-raw" | "audio/basic" | "audio/x-alaw-basic" => {
            ContainerFamily::PcmRiff
        }
        "audio/ogg" | "audio/opus" => ContainerFamily::Ogg,
        "audio/mp3" => ContainerFamily::Mp3,
        _ => return Err(AudioError::UnsupportedMime(mime.to_string())),
    };

    let mut sample_rate: u32 = 0;
    let mut bits_per_sample: u16 = 0;

    for param in parts {
        let Some((key, value)) = param.split_once('=') else {
            // Parameters without a value are ignored, matching the lenient
            // behavior expected by existing callers.
            continue;
        };
        match key.trim() {
            "rate" => {
                sample_rate = value
                    .trim()
                    .parse()
                    .map_err(|_| AudioError::UnsupportedMime(mime.to_string()))?;
            }
            "format" => {
                bits_per_sample = match_format(value.trim());
            }
            _ => {}
        }
    }

    if bits_per_sample == 0 {
        let subtype = base.split('/').nth(1).unwrap_or_default();
        bits_per_sample = match_format(subtype);
    }

    if family == ContainerFamily::PcmRiff && (sample_rate == 0 || bits_per_sample == 0) {
        return Err(AudioError::UnsupportedMime(mime.to_string()));
    }

    Ok(MimeDescriptor {
        family,
        sample_rate,
        bits_per_sample,
    })
}
