//! End to end: audio -> transcription -> mapping -> host command.

use crate::integration::mock_server::{function_call_response, MockServerFixture, API_KEY};
use serde_json::json;
use std::sync::Arc;
use voxcode::{RecordingMode, SessionState, VoiceSession, VoxConfig};

#[tokio::test]
async fn test_session_runs_the_whole_pipeline() {
    let mut fixture = MockServerFixture::new().await;
    let stt = fixture
        .mock_transcription(json!({"text": "open the config file", "language": "english"}))
        .await;
    let chat = fixture
        .mock_chat(function_call_response(
            r#"{"command":"workbench.action.quickOpen","args":{"filename":"config"}}"#,
        ))
        .await;

    let debug_dir = std::env::temp_dir().join(format!("voxcode-e2e-{}", uuid::Uuid::new_v4()));
    let config = VoxConfig::from_yaml_str(&format!(
        "base_url: {}\nrecording_mode: testing\ndebug_dir: {}\n",
        fixture.base_url,
        debug_dir.display()
    ))
    .unwrap();

    let (mapper, host, notices) = fixture.mapper();
    let whisper = config.whisper_client(Some(API_KEY.to_string())).unwrap();
    let mut session = VoiceSession::from_config(&config, mapper, Arc::new(whisper));
    assert_eq!(session.mode(), RecordingMode::Testing);

    session.start_recording().unwrap();
    let mapping = session
        .finish_recording(b"RIFF....WAVEfmt ")
        .await
        .unwrap()
        .unwrap();

    stt.assert_async().await;
    chat.assert_async().await;
    assert_eq!(mapping.argument(), Some("config"));
    assert_eq!(session.state(), SessionState::Idle);
    assert_eq!(
        session.last_transcription().map(|t| t.text.as_str()),
        Some("open the config file")
    );

    let calls = host.invocations();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].command, "workbench.action.quickOpen");
    assert_eq!(calls[0].args, Some(json!({"filename": "config"})));
    assert!(notices.is_empty());

    assert!(debug_dir
        .join(voxcode::debug::LAST_TRANSCRIPTION_FILE)
        .exists());
    std::fs::remove_dir_all(&debug_dir).unwrap();
}

#[tokio::test]
async fn test_session_survives_transcription_outage() {
    let mut fixture = MockServerFixture::new().await;
    let _stt = fixture
        .mock_error(
            crate::integration::mock_server::STT_PATH,
            503,
            r#"{"error":{"message":"Service unavailable"}}"#,
        )
        .await;
    let chat = fixture.mock_chat_unreachable().await;

    let (mapper, host, notices) = fixture.mapper();
    let mut session = VoiceSession::new(mapper, Arc::new(fixture.whisper_client()));

    session.start_recording().unwrap();
    assert_eq!(session.finish_recording(b"RIFF").await.unwrap(), None);

    chat.assert_async().await;
    assert_eq!(session.state(), SessionState::Idle);
    assert!(host.invocations().is_empty());
    assert!(notices.errors()[0]
        .message
        .starts_with("Could not transcribe recording"));
}
