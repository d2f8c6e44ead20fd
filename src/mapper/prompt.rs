//! System prompt and callable schemas declared to the model.

use super::Protocol;
use crate::command::EditorCommand;
use crate::types::{FunctionDefinition, ToolDefinition};
use serde_json::{json, Value};

/// Name of the single function under the `functions` calling convention.
pub const EXECUTE_COMMAND: &str = "executeCommand";

/// Instruction listing the commands and the correction/default policy.
pub fn system_prompt(protocol: Protocol) -> String {
    let mut prompt = String::from(
        "You turn speech transcriptions into code editor commands. \
         The user message is what the user said. Pick exactly one command:\n",
    );
    for cmd in EditorCommand::ALL {
        let name = match protocol {
            Protocol::Functions => cmd.id(),
            Protocol::Tools => cmd.tool_name(),
        };
        prompt.push_str(&format!(
            "- {}: {} (optional argument: {})\n",
            name,
            cmd.description(),
            cmd.argument().field_name()
        ));
    }
    let fallback = match protocol {
        Protocol::Functions => format!(
            "{} with the corrected text in args.filename",
            EditorCommand::QuickOpen.id()
        ),
        Protocol::Tools => format!(
            "{} with the corrected text as its argument",
            EditorCommand::QuickOpen.tool_name()
        ),
    };
    prompt.push_str(&format!(
        "Transcriptions often contain typos and misheard words: correct them before choosing. \
         If no command clearly matches, use {}. \
         Write filenames in camelCase. Always answer by calling a function.",
        fallback
    ));
    prompt
}

/// Parameters of `executeCommand`: an enum-constrained `command` plus optional `args.filename`.
pub fn execute_command_parameters() -> Value {
    let ids: Vec<&str> = EditorCommand::ALL.iter().map(|c| c.id()).collect();
    json!({
        "type": "object",
        "properties": {
            "command": {
                "type": "string",
                "enum": ids,
                "description": "Identifier of the editor command to run"
            },
            "args": {
                "type": "object",
                "properties": {
                    "filename": {
                        "type": "string",
                        "description": "Filename (camelCase) or search term, depending on the command"
                    }
                }
            }
        },
        "required": ["command"]
    })
}

pub fn execute_command_function() -> FunctionDefinition {
    FunctionDefinition::new(
        EXECUTE_COMMAND,
        "Run one of the available editor commands",
        execute_command_parameters(),
    )
}

/// One tool per command, each with a single optional string field.
pub fn command_tools() -> Vec<ToolDefinition> {
    EditorCommand::ALL
        .iter()
        .map(|cmd| {
            let role = cmd.argument();
            ToolDefinition::function(FunctionDefinition::new(
                cmd.tool_name(),
                cmd.description(),
                json!({
                    "type": "object",
                    "properties": {
                        role.field_name(): {
                            "type": "string",
                            "description": role.description()
                        }
                    }
                }),
            ))
        })
        .collect()
}
