//! # voxcode
//!
//! Voice commands for code editors: a speech transcription goes in, one of a
//! small fixed set of editor commands comes out.
//!
//! ## Overview
//!
//! The crate asks a chat-completion model to classify the transcribed text
//! by forcing a function call, validates the answer against the closed
//! command set, and runs the result through the host's generic
//! "execute command" facility.
//!
//! - **Closed command set**: [`EditorCommand`] has exactly six variants; anything
//!   else the model says is rejected before it can reach the host
//! - **Two calling conventions**: a single enum-parameter function
//!   ([`CommandMapper::map`]) or one tool per command ([`CommandMapper::map_via_tools`]),
//!   both producing the same [`CommandMapping`] shape
//! - **Never fails the host**: errors are logged, reported once via a
//!   [`notify::Notifier`], and collapse to "no command"
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use voxcode::{ChatClient, CommandMapper, RecordingHost, Transcription};
//!
//! #[tokio::main]
//! async fn main() -> voxcode::Result<()> {
//!     let llm = ChatClient::builder().api_key("sk-...").build()?;
//!     let host = Arc::new(RecordingHost::new());
//!     let mapper = CommandMapper::new(Arc::new(llm), host.clone())?;
//!
//!     if let Some(mapping) = mapper.map(&Transcription::from_text("open the config file")).await {
//!         mapper.execute(&mapping).await;
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`command`] | The six editor commands and the mapping type |
//! | [`mapper`] | Prompt, schemas, both calling conventions, execution |
//! | [`client`] | Chat-completion client and request/response schema |
//! | [`stt`] | Whisper transcription client and transcription types |
//! | [`session`] | Recording lifecycle context object |
//! | [`host`] | Host editor command boundary |
//! | [`notify`] | User-visible notices |
//! | [`config`] | YAML + environment configuration |

pub mod client;
pub mod command;
pub mod config;
pub mod debug;
pub mod host;
pub mod logging;
pub mod mapper;
pub mod notify;
pub mod session;
pub mod stt;
pub mod transport;
pub mod types;

pub use client::{ChatClient, ChatClientBuilder, ChatCompletion};
pub use command::{CommandArgs, CommandMapping, EditorCommand};
pub use config::{RecordingMode, VoxConfig};
pub use host::{CommandHost, RecordingHost};
pub use mapper::{CommandMapper, MapperSettings, Protocol};
pub use session::{SessionState, VoiceSession};
pub use stt::{Segment, Transcriber, Transcription, WhisperClient};

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the library
pub mod error;
pub use error::{Error, ErrorContext};
