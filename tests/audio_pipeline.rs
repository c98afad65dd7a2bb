//! End-to-end tests for the chunked-audio reassembly pipeline

use bytes::Bytes;
use std::sync::Arc;
use voxgate::core::audio::SessionStore;

fn u32_le(bytes: &[u8]) -> u32 {
    u32::from_le_bytes(bytes.try_into().unwrap())
}

#[test]
fn three_frames_assemble_into_one_wav_stream() {
    let store = SessionStore::new();
    let mime = "audio/L16;rate=8000";

    let b0 = vec![1u8; 160];
    let b1 = vec![2u8; 320];
    let b2 = vec![3u8; 80];

    store.add_frame("upload-1", mime, 0, Bytes::from(b0.clone()));
    store.add_frame("upload-1", mime, 1, Bytes::from(b1.clone()));
    store.add_frame("upload-1", mime, 2, Bytes::from(b2.clone()));

    let assembled = store.finalize("upload-1").unwrap();
    let total = b0.len() + b1.len() + b2.len();

    // 44-byte RIFF/WAVE header in front
    assert_eq!(&assembled[0..4], b"RIFF");
    assert_eq!(u32_le(&assembled[4..8]) as usize, 36 + total);
    assert_eq!(&assembled[36..40], b"data");
    assert_eq!(u32_le(&assembled[40..44]) as usize, total);

    // Payload is the concatenation in index order
    let mut expected = Vec::new();
    expected.extend_from_slice(&b0);
    expected.extend_from_slice(&b1);
    expected.extend_from_slice(&b2);
    assert_eq!(&assembled[44..], expected.as_slice());
}

#[tokio::test]
async fn concurrent_uploads_do_not_interfere() {
    let store = Arc::new(SessionStore::new());
    let mime = "audio/L16;rate=16000";

    let mut handles = Vec::new();
    for upload in 0..8u8 {
        let store = Arc::clone(&store);
        handles.push(tokio::spawn(async move {
            let id = format!("upload-{}", upload);
            for index in 0..10u32 {
                store.add_frame(&id, mime, index, Bytes::from(vec![upload; 100]));
                tokio::task::yield_now().await;
            }
            store.finalize(&id).unwrap()
        }));
    }

    for (upload, handle) in handles.into_iter().enumerate() {
        let assembled = handle.await.unwrap();
        assert_eq!(assembled.len(), 44 + 10 * 100);
        // Every payload byte belongs to this upload, none leaked across ids
        assert!(assembled[44..].iter().all(|&byte| byte == upload as u8));
    }
    assert!(store.is_empty());
}

#[tokio::test]
async fn racing_finalizers_agree_on_a_single_winner() {
    let store = Arc::new(SessionStore::new());
    store.add_frame("race", "audio/L16;rate=8000", 0, Bytes::from_static(b"xx"));

    let mut handles = Vec::new();
    for _ in 0..8 {
        let store = Arc::clone(&store);
        handles.push(tokio::spawn(async move { store.finalize("race") }));
    }

    let mut winners = 0;
    for handle in handles {
        if handle.await.unwrap().is_ok() {
            winners += 1;
        }
    }
    assert_eq!(winners, 1);
}
