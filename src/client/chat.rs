use super::builder::ChatClientBuilder;
use super::completion::{ChatCompletion, ChatCompletionRequest, ChatCompletionResponse};
use crate::transport::HttpTransport;
use crate::Result;
use async_trait::async_trait;
use tracing::debug;

/// HTTP chat-completion client (OpenAI-compatible endpoint).
pub struct ChatClient {
    pub(crate) transport: HttpTransport,
    pub(crate) model: String,
    pub(crate) endpoint_path: String,
}

impl ChatClient {
    pub fn builder() -> ChatClientBuilder {
        ChatClientBuilder::new()
    }

    /// Default model id used when a request does not name one.
    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn endpoint(&self) -> String {
        format!("{}{}", self.transport.base_url(), self.endpoint_path)
    }
}

#[async_trait]
impl ChatCompletion for ChatClient {
    async fn complete(&self, request: &ChatCompletionRequest) -> Result<ChatCompletionResponse> {
        let mut request = request.clone();
        if request.model.is_empty() {
            request.model = self.model.clone();
        }
        debug!(
            model = request.model.as_str(),
            functions = request.functions.as_ref().map(|f| f.len()).unwrap_or(0),
            tools = request.tools.as_ref().map(|t| t.len()).unwrap_or(0),
            "sending chat completion"
        );
        self.transport
            .post_json(&self.endpoint_path, &request)
            .await
    }
}
