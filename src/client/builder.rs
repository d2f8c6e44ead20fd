use super::chat::ChatClient;
use crate::transport::{resolve_api_key, HttpTransport, TransportConfig};
use crate::{Error, ErrorContext, Result};

pub(crate) const DEFAULT_BASE_URL: &str = "https://api.openai.com";
pub(crate) const DEFAULT_CHAT_MODEL: &str = "gpt-3.5-turbo-0613";
const DEFAULT_CHAT_PATH: &str = "/v1/chat/completions";

/// Builder for [`ChatClient`].
///
/// Keep this surface area small and predictable (developer-friendly).
pub struct ChatClientBuilder {
    model: Option<String>,
    api_key: Option<String>,
    base_url: Option<String>,
    endpoint_path: Option<String>,
    timeout_secs: u64,
}

impl ChatClientBuilder {
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

    /// Override the API base URL (mock servers, proxies, compatible providers).
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

    /// Build the client.
    ///
    /// The API key falls back to the OS keyring and then `OPENAI_API_KEY`.
    pub fn build(self) -> Result<ChatClient> {
        let api_key = resolve_api_key(self.api_key, "openai").ok_or_else(|| {
            Error::configuration_with_context(
                "API key required",
                ErrorContext::new()
                    .with_field_path("api_key")
                    .with_details("set OPENAI_API_KEY or store a key in the keyring")
                    .with_source("chat_client"),
            )
        })?;
        let model = self
            .model
            .unwrap_or_else(|| DEFAULT_CHAT_MODEL.to_string());
        let base_url = self
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let endpoint_path = normalize_path(self.endpoint_path, DEFAULT_CHAT_PATH);

        let transport = HttpTransport::new(TransportConfig {
            base_url,
            api_key,
            timeout_secs: self.timeout_secs,
        })?;

        Ok(ChatClient {
            transport,
            model,
            endpoint_path,
        })
    }
}

impl Default for ChatClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn normalize_path(path: Option<String>, default: &str) -> String {
    let path = path.unwrap_or_else(|| default.to_string());
    if path.starts_with('/') {
        path
    } else {
        format!("/{}", path)
    }
}
