//! Chat-completion wire types shared by the client and the command mapper.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Message`] | Chat message with role and text content |
//! | [`MessageRole`] | Message role (system, user, assistant) |
//! | [`FunctionDefinition`] | Callable schema declared to the model |
//! | [`ToolDefinition`] | Function wrapped in the `tools` calling convention |
//! | [`FunctionCall`] | Legacy `function_call` invocation returned by the model |
//! | [`ToolCall`] | Invocation returned under `tool_calls` |

pub mod message;
pub mod tool;

pub use message::{Message, MessageRole};
pub use tool::{FunctionCall, FunctionDefinition, ToolCall, ToolDefinition};
