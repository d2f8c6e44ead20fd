//! Mock HTTP server setup for integration tests

use mockito::{Matcher, Mock, Server, ServerGuard};
use serde_json::{json, Value};
use std::sync::Arc;
use voxcode::notify::InMemoryNotifier;
use voxcode::{ChatClient, CommandMapper, RecordingHost, WhisperClient};

pub const CHAT_PATH: &str = "/v1/chat/completions";
pub const STT_PATH: &str = "/v1/audio/transcriptions";
pub const API_KEY: &str = "sk-test";

/// Test fixture that manages a mock server
pub struct MockServerFixture {
    pub server: ServerGuard,
    pub base_url: String,
}

impl MockServerFixture {
    pub async fn new() -> Self {
        let server = Server::new_async().await;
        let base_url = server.url();
        Self { server, base_url }
    }

    pub fn chat_client(&self) -> ChatClient {
        ChatClient::builder()
            .api_key(API_KEY)
            .base_url(&self.base_url)
            .timeout_secs(5)
            .build()
            .expect("chat client")
    }

    pub fn whisper_client(&self) -> WhisperClient {
        WhisperClient::builder()
            .api_key(API_KEY)
            .base_url(&self.base_url)
            .timeout_secs(5)
            .build()
            .expect("whisper client")
    }

    /// Mapper wired to this server, a recording host and an in-memory notifier.
    pub fn mapper(&self) -> (CommandMapper, Arc<RecordingHost>, Arc<InMemoryNotifier>) {
        let host = Arc::new(RecordingHost::new());
        let notices = Arc::new(InMemoryNotifier::default());
        let mapper = CommandMapper::new(Arc::new(self.chat_client()), host.clone())
            .expect("mapper")
            .with_notifier(notices.clone());
        (mapper, host, notices)
    }

    /// Create a mock for a successful chat-completion response
    pub async fn mock_chat(&mut self, body: Value) -> Mock {
        self.server
            .mock("POST", CHAT_PATH)
            .match_header("authorization", format!("Bearer {}", API_KEY).as_str())
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
            .expect(1)
            .create_async()
            .await
    }

    /// Chat mock that only matches when the request carries `user_text`.
    pub async fn mock_chat_for(&mut self, user_text: &str, request: Value, body: Value) -> Mock {
        self.server
            .mock("POST", CHAT_PATH)
            .match_body(Matcher::AllOf(vec![
                Matcher::PartialJson(request),
                Matcher::Regex(format!(r#""role":"user","content":"{}""#, user_text)),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
            .expect(1)
            .create_async()
            .await
    }

    /// Create a mock for an error response
    pub async fn mock_error(&mut self, path: &str, status: usize, error_body: &str) -> Mock {
        self.server
            .mock("POST", path)
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(error_body)
            .create_async()
            .await
    }

    /// Chat mock that must never be hit.
    pub async fn mock_chat_unreachable(&mut self) -> Mock {
        self.server
            .mock("POST", CHAT_PATH)
            .with_status(500)
            .expect(0)
            .create_async()
            .await
    }

    pub async fn mock_transcription(&mut self, body: Value) -> Mock {
        self.server
            .mock("POST", STT_PATH)
            .match_header(
                "content-type",
                Matcher::Regex("multipart/form-data".to_string()),
            )
            .match_header("authorization", format!("Bearer {}", API_KEY).as_str())
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
            .expect(1)
            .create_async()
            .await
    }
}

/// Chat-completion body whose first choice calls `executeCommand`.
pub fn function_call_response(arguments: &str) -> Value {
    json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "model": "gpt-3.5-turbo-0613",
        "choices": [{
            "index": 0,
            "message": {
                "role": "assistant",
                "content": null,
                "function_call": {"name": "executeCommand", "arguments": arguments}
            },
            "finish_reason": "stop"
        }]
    })
}

/// Chat-completion body whose first choice calls tool `name`.
pub fn tool_call_response(name: &str, arguments: &str) -> Value {
    json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "message": {
                "role": "assistant",
                "content": null,
                "tool_calls": [{
                    "id": "call_abc",
                    "type": "function",
                    "function": {"name": name, "arguments": arguments}
                }]
            },
            "finish_reason": "tool_calls"
        }]
    })
}
