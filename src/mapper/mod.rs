//! Command mapping: transcription text in, [`CommandMapping`] out.
//!
//! The mapper issues exactly one chat-completion request per attempt and
//! forces the model to answer with a function/tool call. Two calling
//! conventions are supported side by side:
//!
//! | Protocol | Request shape | Entry point |
//! |----------|---------------|-------------|
//! | [`Protocol::Functions`] | one `executeCommand` function, enum `command` | [`CommandMapper::map`] |
//! | [`Protocol::Tools`] | six tools, one per command | [`CommandMapper::map_via_tools`] |
//!
//! Failure policy: nothing escapes. Transport, decode, validation and host
//! errors are logged, reported once through the [`Notifier`], and collapse to
//! `None` (or `()` for [`CommandMapper::execute`]). There is no retry.

mod functions;
pub mod prompt;
mod tools;
pub mod validate;

use crate::client::ChatCompletion;
use crate::command::CommandMapping;
use crate::host::CommandHost;
use crate::notify::{noop_notifier, Notice, Notifier};
use crate::stt::Transcription;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};
use validate::ArgumentValidator;

/// Function-calling convention used to ask the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    #[default]
    Functions,
    Tools,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapperSettings {
    pub model: String,
    pub temperature: f64,
    /// Texts with this many characters or fewer are ignored as noise.
    pub max_noise_chars: usize,
}

impl Default for MapperSettings {
    fn default() -> Self {
        Self {
            model: crate::client::builder::DEFAULT_CHAT_MODEL.to_string(),
            temperature: 0.2,
            max_noise_chars: 2,
        }
    }
}

pub struct CommandMapper {
    llm: Arc<dyn ChatCompletion>,
    host: Arc<dyn CommandHost>,
    notifier: Arc<dyn Notifier>,
    settings: MapperSettings,
    validator: ArgumentValidator,
}

impl CommandMapper {
    pub fn new(llm: Arc<dyn ChatCompletion>, host: Arc<dyn CommandHost>) -> Result<Self> {
        Ok(Self {
            llm,
            host,
            notifier: noop_notifier(),
            settings: MapperSettings::default(),
            validator: ArgumentValidator::new(&prompt::execute_command_parameters())?,
        })
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn with_settings(mut self, settings: MapperSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn settings(&self) -> &MapperSettings {
        &self.settings
    }

    /// Whether `text` is long enough to carry an intent.
    pub fn accepts(&self, text: &str) -> bool {
        text.trim().chars().count() > self.settings.max_noise_chars
    }

    /// Map via the single `executeCommand` function.
    pub async fn map(&self, transcription: &Transcription) -> Option<CommandMapping> {
        self.map_with(Protocol::Functions, transcription).await
    }

    /// Map via one tool per command.
    pub async fn map_via_tools(&self, transcription: &Transcription) -> Option<CommandMapping> {
        self.map_with(Protocol::Tools, transcription).await
    }

    pub async fn map_with(
        &self,
        protocol: Protocol,
        transcription: &Transcription,
    ) -> Option<CommandMapping> {
        let text = transcription.text.trim();
        if !self.accepts(text) {
            debug!(chars = text.chars().count(), "transcription too short, ignoring");
            return None;
        }

        let start = Instant::now();
        match self.request_mapping(protocol, text).await {
            Ok(Some(mapping)) => {
                info!(
                    command = mapping.command.id(),
                    argument = mapping.argument().unwrap_or(""),
                    protocol = ?protocol,
                    duration_ms = start.elapsed().as_millis(),
                    "voice command mapped"
                );
                Some(mapping)
            }
            Ok(None) => {
                debug!(protocol = ?protocol, "model returned no function call");
                None
            }
            Err(e) => {
                self.report_failure("map", &e).await;
                None
            }
        }
    }

    async fn request_mapping(&self, protocol: Protocol, text: &str) -> Result<Option<CommandMapping>> {
        match protocol {
            Protocol::Functions => {
                let request = functions::build_request(&self.settings, text);
                let response = self.llm.complete(&request).await?;
                response
                    .first_function_call()
                    .map(|call| functions::parse_function_call(call, &self.validator))
                    .transpose()
            }
            Protocol::Tools => {
                let request = tools::build_request(&self.settings, text);
                let response = self.llm.complete(&request).await?;
                response
                    .first_tool_call()
                    .map(tools::parse_tool_call)
                    .transpose()
            }
        }
    }

    /// Run the mapping through the host. Host failures are reported, never raised.
    pub async fn execute(&self, mapping: &CommandMapping) {
        let command = mapping.command.id();
        match self.host.execute_command(command, mapping.host_args()).await {
            Ok(()) => debug!(command, "host command executed"),
            Err(e) => self.report_failure("execute", &e).await,
        }
    }

    pub(crate) async fn report_failure(&self, operation: &str, err: &Error) {
        warn!(
            operation,
            error_kind = err.kind(),
            error = %err,
            "voice command failed"
        );
        if let Err(e) = self
            .notifier
            .notify(Notice::error(user_message(operation, err)))
            .await
        {
            warn!(operation, error = %e, "could not deliver notice");
        }
    }
}

fn user_message(operation: &str, err: &Error) -> String {
    match (operation, err) {
        (_, Error::UnknownCommand(cmd)) => {
            format!("Voice command not recognized: '{}'", cmd)
        }
        ("execute", e) => format!("Could not run voice command: {}", e),
        ("transcribe", e) => format!("Could not transcribe recording: {}", e),
        (_, e) => format!("Could not map voice command: {}", e),
    }
}
