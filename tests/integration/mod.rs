//! Integration tests with mock HTTP servers

pub mod mapping;
pub mod mock_server;
pub mod session;
pub mod transcription;
