//! HTTP transport shared by the chat and transcription clients.

mod http;

pub use http::{resolve_api_key, HttpTransport, TransportConfig, TransportError};
