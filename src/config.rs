//! Configuration: YAML file plus `VOXCODE_*` environment overrides.
//!
//! ```yaml
//! model: gpt-4o-mini
//! base_url: https://api.openai.com
//! recording_mode: new-recording
//! protocol: tools
//! ```

use crate::client::builder::{DEFAULT_BASE_URL, DEFAULT_CHAT_MODEL};
use crate::client::ChatClient;
use crate::mapper::{MapperSettings, Protocol};
use crate::stt::{TranscribeOptions, WhisperClient};
use crate::{Error, ErrorContext, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Which recording flow the host drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RecordingMode {
    /// Fixed-length recording, transcribed as soon as it ends.
    #[default]
    Regular,
    /// Like `regular`, but keeps the last transcription on disk.
    Testing,
    /// Press to start, press again to stop.
    NewRecording,
}

impl RecordingMode {
    pub fn stops_on_release(self) -> bool {
        matches!(self, RecordingMode::NewRecording)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RecordingMode::Regular => "regular",
            RecordingMode::Testing => "testing",
            RecordingMode::NewRecording => "new-recording",
        }
    }
}

impl fmt::Display for RecordingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordingMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "regular" => Ok(RecordingMode::Regular),
            "testing" => Ok(RecordingMode::Testing),
            "new-recording" | "new_recording" => Ok(RecordingMode::NewRecording),
            other => Err(Error::configuration_with_context(
                format!("unknown recording mode '{}'", other),
                ErrorContext::new()
                    .with_field_path("recording_mode")
                    .with_details("expected regular, testing or new-recording"),
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VoxConfig {
    pub model: String,
    pub transcription_model: String,
    pub base_url: String,
    pub temperature: f64,
    pub recording_mode: RecordingMode,
    pub protocol: Protocol,
    /// `None` follows the recording mode (on for `testing`).
    pub debug_transcript: Option<bool>,
    pub debug_dir: Option<PathBuf>,
    pub language: Option<String>,
    pub timeout_secs: u64,
}

impl Default for VoxConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_CHAT_MODEL.to_string(),
            transcription_model: "whisper-1".to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            temperature: 0.2,
            recording_mode: RecordingMode::default(),
            protocol: Protocol::default(),
            debug_transcript: None,
            debug_dir: None,
            language: None,
            timeout_secs: 60,
        }
    }
}

impl VoxConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: VoxConfig = serde_yaml::from_str(yaml).map_err(|e| {
            Error::configuration_with_context(
                format!("invalid configuration: {}", e),
                ErrorContext::new().with_source("config"),
            )
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content).map_err(|e| match e {
            Error::Configuration { message, context } => Error::Configuration {
                message,
                context: context.with_details(path.display().to_string()),
            },
            other => other,
        })
    }

    /// Apply `VOXCODE_*` overrides from the process environment.
    pub fn apply_env(self) -> Result<Self> {
        self.apply_env_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary lookup (the environment in production).
    pub fn apply_env_from<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(model) = lookup("VOXCODE_MODEL") {
            self.model = model;
        }
        if let Some(url) = lookup("VOXCODE_BASE_URL") {
            self.base_url = url;
        }
        if let Some(mode) = lookup("VOXCODE_RECORDING_MODE") {
            self.recording_mode = mode.parse()?;
        }
        if let Some(protocol) = lookup("VOXCODE_PROTOCOL") {
            self.protocol = match protocol.trim().to_lowercase().as_str() {
                "functions" => Protocol::Functions,
                "tools" => Protocol::Tools,
                other => {
                    return Err(Error::configuration_with_context(
                        format!("unknown protocol '{}'", other),
                        ErrorContext::new().with_field_path("protocol"),
                    ))
                }
            };
        }
        if let Some(secs) = lookup("VOXCODE_TIMEOUT_SECS") {
            self.timeout_secs = secs.trim().parse().map_err(|_| {
                Error::configuration_with_context(
                    format!("invalid VOXCODE_TIMEOUT_SECS: '{}'", secs),
                    ErrorContext::new()
                        .with_field_path("timeout_secs")
                        .with_details("expected a whole number of seconds"),
                )
            })?;
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.base_url).map_err(|e| {
            Error::configuration_with_context(
                format!("invalid base_url: {}", e),
                ErrorContext::new()
                    .with_field_path("base_url")
                    .with_details(self.base_url.clone()),
            )
        })?;
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(Error::configuration_with_context(
                "temperature must be between 0 and 2",
                ErrorContext::new().with_field_path("temperature"),
            ));
        }
        if self.model.trim().is_empty() {
            return Err(Error::configuration_with_context(
                "model must not be empty",
                ErrorContext::new().with_field_path("model"),
            ));
        }
        Ok(())
    }

    pub fn debug_transcript_enabled(&self) -> bool {
        self.debug_transcript
            .unwrap_or(self.recording_mode == RecordingMode::Testing)
    }

    pub fn debug_dir(&self) -> PathBuf {
        self.debug_dir
            .clone()
            .unwrap_or_else(crate::debug::default_dir)
    }

    pub fn mapper_settings(&self) -> MapperSettings {
        MapperSettings {
            model: self.model.clone(),
            temperature: self.temperature,
            ..MapperSettings::default()
        }
    }

    pub fn transcribe_options(&self) -> TranscribeOptions {
        TranscribeOptions {
            language: self.language.clone(),
            ..TranscribeOptions::default()
        }
    }

    pub fn chat_client(&self, api_key: Option<String>) -> Result<ChatClient> {
        let mut builder = ChatClient::builder()
            .model(self.model.clone())
            .base_url(self.base_url.clone())
            .timeout_secs(self.timeout_secs);
        if let Some(key) = api_key {
            builder = builder.api_key(key);
        }
        builder.build()
    }

    pub fn whisper_client(&self, api_key: Option<String>) -> Result<WhisperClient> {
        let mut builder = WhisperClient::builder()
            .model(self.transcription_model.clone())
            .base_url(self.base_url.clone())
            .timeout_secs(self.timeout_secs);
        if let Some(key) = api_key {
            builder = builder.api_key(key);
        }
        builder.build()
    }
}
