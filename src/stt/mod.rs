//! Speech-to-text: the transcription collaborator that feeds the command mapper.

mod client;
mod types;

pub use client::{Transcriber, WhisperClient, WhisperClientBuilder};
pub use types::{Segment, TranscribeOptions, Transcription};
