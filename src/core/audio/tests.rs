//! Tests for the audio pipeline

#[cfg(test)]
mod tests {
    use super::super::container::{check_mime_valid, synthesize_header};
    use super::super::mime::{parse_mime, ContainerFamily};
    use super::super::session::SessionStore;
    use super::super::AudioError;
    use bytes::Bytes;
    use std::time::Duration;

    fn u32_le(bytes: &[u8]) -> u32 {
        u32::from_le_bytes(bytes.try_into().unwrap())
    }

    fn u16_le(bytes: &[u8]) -> u16 {
        u16::from_le_bytes(bytes.try_into().unwrap())
    }

    // An earlier revision clobbered the depth matched from the `format`
    // parameter with a constant 8. That was judged a defect and fixed:
    // the matched token's real depth is used.
    #[test]
    fn parse_l16_rate_8000() {
        let desc = parse_mime("audio/L16;rate=8000").unwrap();
        assert_eq!(desc.family, ContainerFamily::PcmRiff);
        assert_eq!(desc.sample_rate, 8000);
        assert_eq!(desc.bits_per_sample, 16);
    }

    #[test]
    fn parse_format_parameter_wins() {
        let desc = parse_mime("audio/x-raw;rate=16000;format=S16LE").unwrap();
        assert_eq!(desc.bits_per_sample, 16);

        let desc = parse_mime("audio/x-raw;rate=16000;format=S8").unwrap();
        assert_eq!(desc.bits_per_sample, 8);
    }

    #[test]
    fn parse_rejects_unresolvable_pcm() {
        // No rate
        assert!(matches!(
            parse_mime("audio/L16"),
            Err(AudioError::UnsupportedMime(_))
        ));
        // No way to infer a bit depth
        assert!(matches!(
            parse_mime("audio/x-raw;rate=8000"),
            Err(AudioError::UnsupportedMime(_))
        ));
        // Unknown family
        assert!(matches!(
            parse_mime("video/mp4"),
            Err(AudioError::UnsupportedMime(_))
        ));
        // Bad rate value
        assert!(matches!(
            parse_mime("audio/L16;rate=fast"),
            Err(AudioError::UnsupportedMime(_))
        ));
    }

    #[test]
    fn parse_ogg_and_mp3_need_only_family() {
        assert_eq!(parse_mime("audio/ogg").unwrap().family, ContainerFamily::Ogg);
        assert_eq!(
            parse_mime("audio/opus").unwrap().family,
            ContainerFamily::Ogg
        );
        assert_eq!(parse_mime("audio/mp3").unwrap().family, ContainerFamily::Mp3);
    }

    #[test]
    fn parse_skips_malformed_parameters() {
        let desc = parse_mime("audio/L16;chunked;rate=8000").unwrap();
        assert_eq!(desc.sample_rate, 8000);
    }

    #[test]
    fn riff_header_layout() {
        let desc = parse_mime("audio/L16;rate=8000").unwrap();
        for payload_len in [0usize, 1, 320, 65536] {
            let header = synthesize_header(&desc, payload_len).unwrap();
            assert_eq!(header.len(), 44);
            assert_eq!(&header[0..4], b"RIFF");
            assert_eq!(u32_le(&header[4..8]), 36 + payload_len as u32);
            assert_eq!(&header[8..12], b"WAVE");
            assert_eq!(&header[12..16], b"fmt ");
            assert_eq!(u32_le(&header[16..20]), 16);
            assert_eq!(u16_le(&header[20..22]), 1); // linear PCM
            assert_eq!(u16_le(&header[22..24]), 1); // mono
            assert_eq!(u32_le(&header[24..28]), 8000);
            assert_eq!(u32_le(&header[28..32]), 16000); // rate * block align
            assert_eq!(u16_le(&header[32..34]), 2); // block align
            assert_eq!(u16_le(&header[34..36]), 16);
            assert_eq!(&header[36..40], b"data");
            assert_eq!(u32_le(&header[40..44]), payload_len as u32);
        }
    }

    #[test]
    fn ogg_and_mp3_magic_bytes_only() {
        let ogg = parse_mime("audio/ogg").unwrap();
        assert_eq!(synthesize_header(&ogg, 100).unwrap(), b"OggS");

        let mp3 = parse_mime("audio/mp3").unwrap();
        assert_eq!(synthesize_header(&mp3, 100).unwrap(), b"ID3");
    }

    #[test]
    fn mime_validity_is_operational() {
        assert!(check_mime_valid("audio/L16;rate=8000"));
        assert!(check_mime_valid("audio/basic;rate=8000;format=S8"));
        assert!(check_mime_valid("audio/ogg"));
        assert!(check_mime_valid("audio/mp3"));
        assert!(!check_mime_valid("audio/L16"));
        assert!(!check_mime_valid("text/plain"));
        assert!(!check_mime_valid(""));
    }

    #[test]
    fn finalize_assembles_in_index_order() {
        let store = SessionStore::new();
        // Frames delivered in reverse order must still assemble ascending.
        store.add_frame("s1", "audio/L16;rate=8000", 2, Bytes::from_static(b"cc"));
        store.add_frame("s1", "audio/L16;rate=8000", 1, Bytes::from_static(b"bb"));
        store.add_frame("s1", "audio/L16;rate=8000", 0, Bytes::from_static(b"aa"));

        let assembled = store.finalize("s1").unwrap();
        assert_eq!(&assembled[44..], b"aabbcc");
        assert_eq!(u32_le(&assembled[40..44]), 6);
        assert!(store.is_empty());
    }

    #[test]
    fn finalize_twice_reports_missing_session() {
        let store = SessionStore::new();
        store.add_frame("s1", "audio/L16;rate=8000", 0, Bytes::from_static(b"aa"));
        store.finalize("s1").unwrap();

        assert_eq!(
            store.finalize("s1"),
            Err(AudioError::SessionNotFound("s1".to_string()))
        );
    }

    #[test]
    fn first_mime_wins() {
        let store = SessionStore::new();
        store.add_frame("s1", "audio/L16;rate=8000", 0, Bytes::from_static(b"aa"));
        store.add_frame("s1", "audio/mp3", 1, Bytes::from_static(b"bb"));

        let assembled = store.finalize("s1").unwrap();
        // Still a RIFF header, not an ID3 tag
        assert_eq!(&assembled[0..4], b"RIFF");
    }

    #[test]
    fn evict_stale_sweeps_only_old_sessions() {
        let store = SessionStore::new();
        store.add_frame("old", "audio/L16;rate=8000", 0, Bytes::from_static(b"aa"));

        // Nothing is older than an hour yet
        assert_eq!(store.evict_stale(Duration::from_secs(3600)), 0);
        assert_eq!(store.len(), 1);

        // Everything is older than zero
        assert_eq!(store.evict_stale(Duration::ZERO), 1);
        assert!(store.is_empty());
    }

    #[test]
    fn concurrent_add_frames_lose_nothing() {
        use std::sync::Arc;

        let store = Arc::new(SessionStore::new());
        let mut handles = Vec::new();
        for index in 0u32..16 {
            let store = Arc::clone(&store);
            handles.push(std::thread::spawn(move || {
                store.add_frame(
                    "s1",
                    "audio/L16;rate=8000",
                    index,
                    Bytes::from(vec![index as u8; 4]),
                );
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        let assembled = store.finalize("s1").unwrap();
        assert_eq!(assembled.len(), 44 + 16 * 4);
        for index in 0u32..16 {
            let start = 44 + (index as usize) * 4;
            assert_eq!(&assembled[start..start + 4], &[index as u8; 4]);
        }
    }
}
