//! `functions` calling convention: one `executeCommand` function with an enum parameter.

use super::prompt::{execute_command_function, system_prompt, EXECUTE_COMMAND};
use super::validate::ArgumentValidator;
use super::{MapperSettings, Protocol};
use crate::client::{ChatCompletionRequest, FunctionCallMode};
use crate::command::{CommandMapping, EditorCommand};
use crate::types::{FunctionCall, Message};
use crate::{Error, ErrorContext, Result};
use serde_json::Value;

pub(crate) fn build_request(settings: &MapperSettings, text: &str) -> ChatCompletionRequest {
    ChatCompletionRequest::new(
        settings.model.clone(),
        vec![
            Message::system(system_prompt(Protocol::Functions)),
            Message::user(text),
        ],
    )
    .temperature(settings.temperature)
    .functions(vec![execute_command_function()])
    .function_call(FunctionCallMode::force(EXECUTE_COMMAND))
}

/// Decode and check `executeCommand` arguments.
///
/// The command is checked against the closed set before the schema so an
/// out-of-set identifier surfaces as [`Error::UnknownCommand`].
pub(crate) fn parse_function_call(
    call: &FunctionCall,
    validator: &ArgumentValidator,
) -> Result<CommandMapping> {
    if call.name != EXECUTE_COMMAND {
        return Err(Error::validation_with_context(
            format!("model called unexpected function '{}'", call.name),
            ErrorContext::new()
                .with_field_path("function_call.name")
                .with_source("command_mapper"),
        ));
    }

    let mut value: Value = serde_json::from_str(&call.arguments)?;
    if let Some(obj) = value.as_object_mut() {
        if obj.get("args").map_or(false, Value::is_null) {
            obj.remove("args");
        }
    }

    if let Some(raw) = value.get("command").and_then(Value::as_str) {
        raw.parse::<EditorCommand>()?;
    }
    validator.validate(&value)?;

    Ok(serde_json::from_value(value)?)
}
