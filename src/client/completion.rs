//! Chat-completion request/response schema and the [`ChatCompletion`] seam.

use crate::types::{FunctionCall, FunctionDefinition, Message, ToolCall, ToolDefinition};
use crate::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Anything that can answer a chat-completion request.
///
/// [`ChatClient`](super::ChatClient) is the HTTP implementation; tests and
/// hosts with their own model plumbing can supply another.
#[async_trait]
pub trait ChatCompletion: Send + Sync {
    async fn complete(&self, request: &ChatCompletionRequest) -> Result<ChatCompletionResponse>;
}

/// `function_call` request field: `"auto"`/`"none"` or a forced function name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FunctionCallMode {
    Named { name: String },
    Mode(String),
}

impl FunctionCallMode {
    pub fn force(name: impl Into<String>) -> Self {
        FunctionCallMode::Named { name: name.into() }
    }
}

/// `tool_choice` request field (`"auto"`, `"none"` or `"required"`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ToolChoice(pub String);

impl ToolChoice {
    /// The model must call one of the declared tools.
    pub fn required() -> Self {
        ToolChoice("required".to_string())
    }
}

/// Non-streaming chat-completion request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<Message>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub functions: Option<Vec<FunctionDefinition>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_call: Option<FunctionCallMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<ToolDefinition>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_choice: Option<ToolChoice>,
}

impl ChatCompletionRequest {
    pub fn new(model: impl Into<String>, messages: Vec<Message>) -> Self {
        Self {
            model: model.into(),
            messages,
            temperature: None,
            functions: None,
            function_call: None,
            tools: None,
            tool_choice: None,
        }
    }

    pub fn temperature(mut self, temp: f64) -> Self {
        self.temperature = Some(temp);
        self
    }

    /// Declare functions (legacy `functions` calling convention).
    pub fn functions(mut self, functions: Vec<FunctionDefinition>) -> Self {
        self.functions = Some(functions);
        self
    }

    pub fn function_call(mut self, mode: FunctionCallMode) -> Self {
        self.function_call = Some(mode);
        self
    }

    /// Declare tools (`tools` calling convention).
    pub fn tools(mut self, tools: Vec<ToolDefinition>) -> Self {
        self.tools = Some(tools);
        self
    }

    pub fn tool_choice(mut self, choice: ToolChoice) -> Self {
        self.tool_choice = Some(choice);
        self
    }

    /// Text of the last user message, if any.
    pub fn user_text(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == crate::types::MessageRole::User)
            .map(|m| m.content.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Choice {
    #[serde(default)]
    pub index: u32,
    pub message: ResponseMessage,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ResponseMessage {
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub function_call: Option<FunctionCall>,
    #[serde(default)]
    pub tool_calls: Option<Vec<ToolCall>>,
}

impl ChatCompletionResponse {
    /// First choice's `function_call`, if the model produced one.
    pub fn first_function_call(&self) -> Option<&FunctionCall> {
        self.choices.first()?.message.function_call.as_ref()
    }

    /// First choice's first tool call, if the model produced one.
    pub fn first_tool_call(&self) -> Option<&ToolCall> {
        self.choices.first()?.message.tool_calls.as_ref()?.first()
    }
}
