//! Chat-completion client for the language-model collaborator.
//!
//! Developer-friendly goal: keep the public surface small and predictable.
//! Implementation details are split into submodules under `src/client/`.

pub mod builder;
pub mod chat;
pub mod completion;

pub use builder::ChatClientBuilder;
pub use chat::ChatClient;
pub use completion::{
    ChatCompletion, ChatCompletionRequest, ChatCompletionResponse, Choice, FunctionCallMode,
    ResponseMessage, ToolChoice,
};
