//! `tools` calling convention: one named tool per command.
//!
//! The chosen tool's single argument is folded into `CommandArgs` here so
//! both conventions hand the executor the same shape.

use super::prompt::{command_tools, system_prompt};
use super::{MapperSettings, Protocol};
use crate::client::{ChatCompletionRequest, ToolChoice};
use crate::command::{CommandMapping, EditorCommand};
use crate::types::{Message, ToolCall};
use crate::{Error, ErrorContext, Result};
use serde_json::Value;

pub(crate) fn build_request(settings: &MapperSettings, text: &str) -> ChatCompletionRequest {
    ChatCompletionRequest::new(
        settings.model.clone(),
        vec![
            Message::system(system_prompt(Protocol::Tools)),
            Message::user(text),
        ],
    )
    .temperature(settings.temperature)
    .tools(command_tools())
    .tool_choice(ToolChoice::required())
}

pub(crate) fn parse_tool_call(call: &ToolCall) -> Result<CommandMapping> {
    let name = call.function.name.as_str();
    let command = EditorCommand::from_tool_name(name)
        .ok_or_else(|| Error::UnknownCommand(name.to_string()))?;

    let mapping = CommandMapping::new(command);
    match tool_argument(command, &call.function.arguments)? {
        Some(arg) => Ok(mapping.with_filename(arg)),
        None => Ok(mapping),
    }
}

/// Pull the single string argument out of whatever the model sent.
fn tool_argument(command: EditorCommand, raw: &str) -> Result<Option<String>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }

    let value: Value = serde_json::from_str(raw)?;
    let arg = match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        Value::Object(map) => {
            let field = command.argument().field_name();
            let picked = map
                .get(field)
                .or_else(|| map.get("filename"))
                .or_else(|| if map.len() == 1 { map.values().next() } else { None });
            match picked {
                None | Some(Value::Null) => None,
                Some(Value::String(s)) => Some(s.clone()),
                Some(other) => return Err(invalid_argument(command, other)),
            }
        }
        other => return Err(invalid_argument(command, &other)),
    };

    Ok(arg.filter(|s| !s.trim().is_empty()))
}

fn invalid_argument(command: EditorCommand, value: &Value) -> Error {
    Error::validation_with_context(
        format!("tool '{}' expects a string argument", command.tool_name()),
        ErrorContext::new()
            .with_field_path("tool_calls[0].function.arguments")
            .with_details(value.to_string())
            .with_source("command_mapper"),
    )
}
