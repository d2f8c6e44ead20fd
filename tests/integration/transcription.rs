//! Whisper client against a mock transcription endpoint.

use crate::integration::mock_server::{MockServerFixture, STT_PATH};
use serde_json::json;
use voxcode::stt::TranscribeOptions;
use voxcode::{Error, Transcriber};

fn verbose_json(text: &str) -> serde_json::Value {
    json!({
        "task": "transcribe",
        "language": "english",
        "duration": 1.2,
        "text": text,
        "segments": [{
            "id": 0,
            "seek": 0,
            "start": 0.0,
            "end": 1.2,
            "text": format!(" {}", text),
            "tokens": [50364, 7238, 264, 4874, 3991, 50424],
            "temperature": 0.0,
            "avg_logprob": -0.21,
            "compression_ratio": 0.8,
            "no_speech_prob": 0.02
        }]
    })
}

#[tokio::test]
async fn test_transcribe_parses_segments() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture
        .mock_transcription(verbose_json("open the config file"))
        .await;
    let client = fixture.whisper_client();

    let t = client
        .transcribe(b"RIFF....WAVEfmt ", &TranscribeOptions::default())
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(t.text, "open the config file");
    assert_eq!(t.language, "english");
    assert_eq!(t.segments.len(), 1);
    assert_eq!(t.segments[0].end, 1.2);
    assert_eq!(t.segments[0].tokens.len(), 6);
}

#[tokio::test]
async fn test_transcribe_file_reads_from_disk() {
    let mut fixture = MockServerFixture::new().await;
    let _mock = fixture.mock_transcription(verbose_json("save")).await;
    let client = fixture.whisper_client();

    let path = std::env::temp_dir().join(format!("voxcode-{}.wav", uuid::Uuid::new_v4()));
    std::fs::write(&path, b"RIFF....WAVEfmt ").unwrap();
    let t = client
        .transcribe_file(&path, &TranscribeOptions::default())
        .await
        .unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(t.text, "save");
}

#[tokio::test]
async fn test_transcribe_error_status() {
    let mut fixture = MockServerFixture::new().await;
    let _mock = fixture
        .mock_error(STT_PATH, 400, r#"{"error":{"message":"Invalid file format."}}"#)
        .await;
    let client = fixture.whisper_client();

    let err = client
        .transcribe(b"not audio", &TranscribeOptions::default())
        .await
        .unwrap_err();
    match err {
        Error::Remote { status, message } => {
            assert_eq!(status, 400);
            assert_eq!(message, "Invalid file format.");
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[tokio::test]
async fn test_empty_audio_is_rejected_locally() {
    let fixture = MockServerFixture::new().await;
    let client = fixture.whisper_client();
    let err = client
        .transcribe(&[], &TranscribeOptions::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "validation");
}
