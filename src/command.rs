//! The closed set of editor commands a voice command can resolve to.
//!
//! Every mapping the crate hands to a host carries an [`EditorCommand`], so an
//! identifier outside this set can never reach command execution.

use crate::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the six host editor commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EditorCommand {
    #[serde(rename = "workbench.action.quickOpen")]
    QuickOpen,
    #[serde(rename = "workbench.action.files.newUntitledFile")]
    NewUntitledFile,
    #[serde(rename = "workbench.action.files.save")]
    SaveFile,
    #[serde(rename = "workbench.action.closeActiveEditor")]
    CloseActiveEditor,
    #[serde(rename = "workbench.action.findInFiles")]
    FindInFiles,
    #[serde(rename = "references-view.findReferences")]
    FindReferences,
}

/// What the single optional argument of a command means.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgumentRole {
    Filename,
    SearchTerm,
}

impl ArgumentRole {
    /// Field name used in the per-command tool schemas.
    pub fn field_name(self) -> &'static str {
        match self {
            ArgumentRole::Filename => "filename",
            ArgumentRole::SearchTerm => "searchTerm",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            ArgumentRole::Filename => "Name of the file, in camelCase",
            ArgumentRole::SearchTerm => "Text or symbol to search for",
        }
    }
}

impl EditorCommand {
    pub const ALL: [EditorCommand; 6] = [
        EditorCommand::QuickOpen,
        EditorCommand::NewUntitledFile,
        EditorCommand::SaveFile,
        EditorCommand::CloseActiveEditor,
        EditorCommand::FindInFiles,
        EditorCommand::FindReferences,
    ];

    /// Host command identifier.
    pub fn id(self) -> &'static str {
        match self {
            EditorCommand::QuickOpen => "workbench.action.quickOpen",
            EditorCommand::NewUntitledFile => "workbench.action.files.newUntitledFile",
            EditorCommand::SaveFile => "workbench.action.files.save",
            EditorCommand::CloseActiveEditor => "workbench.action.closeActiveEditor",
            EditorCommand::FindInFiles => "workbench.action.findInFiles",
            EditorCommand::FindReferences => "references-view.findReferences",
        }
    }

    /// Function name under the `tools` calling convention.
    pub fn tool_name(self) -> &'static str {
        match self {
            EditorCommand::QuickOpen => "quickOpen",
            EditorCommand::NewUntitledFile => "newFile",
            EditorCommand::SaveFile => "saveFile",
            EditorCommand::CloseActiveEditor => "closeEditor",
            EditorCommand::FindInFiles => "findInFiles",
            EditorCommand::FindReferences => "findReferences",
        }
    }

    /// Intent description shown to the model.
    pub fn description(self) -> &'static str {
        match self {
            EditorCommand::QuickOpen => "Open a file by name with the quick-open picker",
            EditorCommand::NewUntitledFile => "Create a new untitled file",
            EditorCommand::SaveFile => "Save the active file",
            EditorCommand::CloseActiveEditor => "Close the active editor tab",
            EditorCommand::FindInFiles => "Search for text across all files in the workspace",
            EditorCommand::FindReferences => "Find all references to a symbol",
        }
    }

    pub fn argument(self) -> ArgumentRole {
        match self {
            EditorCommand::FindInFiles | EditorCommand::FindReferences => ArgumentRole::SearchTerm,
            _ => ArgumentRole::Filename,
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.id() == id)
    }

    pub fn from_tool_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.tool_name() == name)
    }
}

impl fmt::Display for EditorCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for EditorCommand {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_id(s.trim()).ok_or_else(|| Error::UnknownCommand(s.to_string()))
    }
}

/// The single optional argument. Search commands reuse `filename` for their term.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CommandArgs {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
}

impl CommandArgs {
    pub fn filename(value: impl Into<String>) -> Self {
        Self {
            filename: Some(value.into()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.filename.as_deref().map_or(true, |s| s.trim().is_empty())
    }
}

/// Decision of which command to run, produced fresh per transcription.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandMapping {
    pub command: EditorCommand,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub args: Option<CommandArgs>,
}

impl CommandMapping {
    pub fn new(command: EditorCommand) -> Self {
        Self {
            command,
            args: None,
        }
    }

    pub fn with_filename(mut self, value: impl Into<String>) -> Self {
        self.args = Some(CommandArgs::filename(value));
        self
    }

    pub fn argument(&self) -> Option<&str> {
        self.args.as_ref()?.filename.as_deref()
    }

    /// Argument object handed to the host, `None` when there is nothing to pass.
    pub fn host_args(&self) -> Option<serde_json::Value> {
        let args = self.args.as_ref().filter(|a| !a.is_empty())?;
        serde_json::to_value(args).ok()
    }
}
