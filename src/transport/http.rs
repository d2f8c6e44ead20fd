use crate::{Error, ErrorContext, Result};
use keyring::Entry;
use reqwest::Proxy;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::env;
use std::time::{Duration, Instant};
use tracing::{debug, info};
use uuid::Uuid;

const KEYRING_SERVICE: &str = "voxcode";

/// Connection settings for [`HttpTransport`].
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub base_url: String,
    pub api_key: String,
    pub timeout_secs: u64,
}

/// Thin reqwest wrapper: bearer auth, request correlation ids, status mapping.
///
/// Exactly one attempt per call. There is no retry or backoff at this layer.
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl HttpTransport {
    pub fn new(config: TransportConfig) -> Result<Self> {
        let base_url = config.base_url.trim_end_matches('/').to_string();
        url::Url::parse(&base_url).map_err(|e| {
            Error::configuration_with_context(
                format!("Invalid base URL: {}", e),
                ErrorContext::new()
                    .with_field_path("base_url")
                    .with_details(base_url.clone()),
            )
        })?;

        let mut builder = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .pool_idle_timeout(Some(Duration::from_secs(90)));

        if let Ok(proxy_url) = env::var("VOXCODE_PROXY_URL") {
            if let Ok(proxy) = Proxy::all(&proxy_url) {
                builder = builder.proxy(proxy);
            }
        }

        let client = builder
            .build()
            .map_err(|e| Error::Transport(TransportError::Other(e.to_string())))?;

        Ok(Self {
            client,
            base_url,
            api_key: config.api_key,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// POST a JSON body and decode a JSON response.
    pub async fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let req = self.client.post(self.endpoint(path)).json(body);
        self.send(path, req).await
    }

    /// POST a multipart form and decode a JSON response.
    pub async fn post_multipart<R>(&self, path: &str, form: reqwest::multipart::Form) -> Result<R>
    where
        R: DeserializeOwned,
    {
        let req = self.client.post(self.endpoint(path)).multipart(form);
        self.send(path, req).await
    }

    async fn send<R>(&self, path: &str, req: reqwest::RequestBuilder) -> Result<R>
    where
        R: DeserializeOwned,
    {
        let request_id = Uuid::new_v4().to_string();
        let start = Instant::now();

        let resp = req
            .bearer_auth(&self.api_key)
            .header("x-request-id", request_id.as_str())
            .send()
            .await
            .map_err(|e| Error::Transport(TransportError::Http(e)))?;

        let status = resp.status().as_u16();
        let body = resp
            .text()
            .await
            .map_err(|e| Error::Transport(TransportError::Http(e)))?;

        if !(200..300).contains(&status) {
            info!(
                http_status = status,
                request_id = request_id.as_str(),
                endpoint = path,
                duration_ms = start.elapsed().as_millis(),
                "voxcode request failed"
            );
            return Err(Error::Remote {
                status,
                message: remote_message(&body),
            });
        }

        debug!(
            http_status = status,
            request_id = request_id.as_str(),
            endpoint = path,
            duration_ms = start.elapsed().as_millis(),
            "voxcode request completed"
        );

        Ok(serde_json::from_str(&body)?)
    }
}

/// Prefer the OpenAI-style `error.message` over the raw body.
fn remote_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")
                .and_then(|e| e.get("message"))
                .and_then(|m| m.as_str())
                .map(|s| s.to_string())
        })
        .unwrap_or_else(|| body.to_string())
}

/// Resolve an API key: explicit value, then the OS keyring, then `<PROVIDER>_API_KEY`.
pub fn resolve_api_key(explicit: Option<String>, provider_id: &str) -> Option<String> {
    if let Some(key) = explicit.filter(|k| !k.trim().is_empty()) {
        return Some(key);
    }

    if let Ok(entry) = Entry::new(KEYRING_SERVICE, provider_id) {
        if let Ok(key) = entry.get_password() {
            return Some(key);
        }
    }

    let env_var = format!("{}_API_KEY", provider_id.to_uppercase());
    env::var(env_var).ok().filter(|k| !k.trim().is_empty())
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Transport error: {0}")]
    Other(String),
}
