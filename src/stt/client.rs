//! STT (Speech-to-Text) client.

use super::types::{TranscribeOptions, Transcription};
use crate::client::builder::{normalize_path, DEFAULT_BASE_URL};
use crate::transport::{resolve_api_key, HttpTransport, TransportConfig};
use crate::{Error, ErrorContext, Result};
use async_trait::async_trait;
use std::path::Path;
use tracing::info;

const DEFAULT_STT_MODEL: &str = "whisper-1";
const DEFAULT_STT_PATH: &str = "/v1/audio/transcriptions";

/// Source of transcriptions for a voice session.
#[async_trait]
pub trait Transcriber: Send + Sync {
    async fn transcribe(&self, audio: &[u8], options: &TranscribeOptions) -> Result<Transcription>;
}

/// Client for the Whisper transcription endpoint.
pub struct WhisperClient {
    transport: HttpTransport,
    model: String,
    endpoint_path: String,
}

impl WhisperClient {
    pub fn builder() -> WhisperClientBuilder {
        WhisperClientBuilder::new()
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Transcribe a WAV file from disk.
    pub async fn transcribe_file(
        &self,
        path: impl AsRef<Path>,
        options: &TranscribeOptions,
    ) -> Result<Transcription> {
        let audio = tokio::fs::read(path.as_ref()).await?;
        self.transcribe(&audio, options).await
    }
}

#[async_trait]
impl Transcriber for WhisperClient {
    async fn transcribe(&self, audio: &[u8], options: &TranscribeOptions) -> Result<Transcription> {
        if audio.is_empty() {
            return Err(Error::validation_with_context(
                "Empty audio sample",
                ErrorContext::new().with_source("stt"),
            ));
        }

        let part = reqwest::multipart::Part::bytes(audio.to_vec())
            .file_name("audio.wav")
            .mime_str("audio/wav")
            .map_err(|e| Error::configuration(format!("Invalid mime: {}", e)))?;
        let mut form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("model", self.model.clone())
            .text("response_format", "verbose_json");
        if let Some(lang) = &options.language {
            form = form.text("language", lang.clone());
        }
        if let Some(prompt) = &options.prompt {
            form = form.text("prompt", prompt.clone());
        }
        if let Some(temp) = options.temperature {
            form = form.text("temperature", temp.to_string());
        }

        let transcription: Transcription = self
            .transport
            .post_multipart(&self.endpoint_path, form)
            .await?;
        info!(
            language = transcription.language.as_str(),
            segments = transcription.segments.len(),
            chars = transcription.text.chars().count(),
            "transcription received"
        );
        Ok(transcription)
    }
}

pub struct WhisperClientBuilder {
    model: Option<String>,
    api_key: Option<String>,
    base_url: Option<String>,
    endpoint_path: Option<String>,
    timeout_secs: u64,
}

impl WhisperClientBuilder {
    pub fn new() -> Self {
        Self {
            model: None,
            api_key: None,
            base_url: None,
            endpoint_path: None,
            timeout_secs: 60,
        }
    }
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }
    pub fn endpoint_path(mut self, path: impl Into<String>) -> Self {
        self.endpoint_path = Some(path.into());
        self
    }
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn build(self) -> Result<WhisperClient> {
        let api_key = resolve_api_key(self.api_key, "openai").ok_or_else(|| {
            Error::configuration_with_context(
                "API key required",
                ErrorContext::new()
                    .with_field_path("api_key")
                    .with_source("stt"),
            )
        })?;
        let transport = HttpTransport::new(TransportConfig {
            base_url: self
                .base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            api_key,
            timeout_secs: self.timeout_secs,
        })?;
        Ok(WhisperClient {
            transport,
            model: self
                .model
                .unwrap_or_else(|| DEFAULT_STT_MODEL.to_string()),
            endpoint_path: normalize_path(self.endpoint_path, DEFAULT_STT_PATH),
        })
    }
}

impl Default for WhisperClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
