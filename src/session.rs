//! Voice session: the explicit context object for one recording lifecycle.
//!
//! A session owns everything a recording cycle touches (mode, state, the
//! transcriber and the mapper). `&mut self` on every lifecycle method keeps
//! at most one recording/transcription/mapping cycle in flight.

use crate::command::CommandMapping;
use crate::config::{RecordingMode, VoxConfig};
use crate::mapper::{CommandMapper, Protocol};
use crate::notify::Notice;
use crate::stt::{TranscribeOptions, Transcriber, Transcription};
use crate::{Error, ErrorContext, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Recording,
    Transcribing,
    Mapping,
}

pub struct VoiceSession {
    mode: RecordingMode,
    protocol: Protocol,
    state: SessionState,
    mapper: CommandMapper,
    transcriber: Arc<dyn Transcriber>,
    options: TranscribeOptions,
    debug_dir: Option<PathBuf>,
    last_transcription: Option<Transcription>,
}

impl VoiceSession {
    pub fn new(mapper: CommandMapper, transcriber: Arc<dyn Transcriber>) -> Self {
        Self {
            mode: RecordingMode::default(),
            protocol: Protocol::default(),
            state: SessionState::Idle,
            mapper,
            transcriber,
            options: TranscribeOptions::default(),
            debug_dir: None,
            last_transcription: None,
        }
    }

    /// Session settings taken from a loaded configuration.
    pub fn from_config(
        config: &VoxConfig,
        mapper: CommandMapper,
        transcriber: Arc<dyn Transcriber>,
    ) -> Self {
        let mut session = Self::new(mapper, transcriber)
            .with_mode(config.recording_mode)
            .with_protocol(config.protocol)
            .with_transcribe_options(config.transcribe_options());
        if config.debug_transcript_enabled() {
            session = session.with_debug_dir(config.debug_dir());
        }
        session
    }

    pub fn with_mode(mut self, mode: RecordingMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_protocol(mut self, protocol: Protocol) -> Self {
        self.protocol = protocol;
        self
    }

    pub fn with_transcribe_options(mut self, options: TranscribeOptions) -> Self {
        self.options = options;
        self
    }

    /// Dump each transcription into `dir` before mapping it.
    pub fn with_debug_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.debug_dir = Some(dir.into());
        self
    }

    pub fn mode(&self) -> RecordingMode {
        self.mode
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn mapper(&self) -> &CommandMapper {
        &self.mapper
    }

    pub fn last_transcription(&self) -> Option<&Transcription> {
        self.last_transcription.as_ref()
    }

    pub fn start_recording(&mut self) -> Result<()> {
        if self.state != SessionState::Idle {
            return Err(Error::runtime_with_context(
                "a voice command is already in progress",
                ErrorContext::new()
                    .with_details(format!("{:?}", self.state))
                    .with_source("voice_session"),
            ));
        }
        self.state = SessionState::Recording;
        debug!(mode = self.mode.as_str(), "recording started");
        Ok(())
    }

    /// Drop an in-progress recording without transcribing it.
    pub fn cancel_recording(&mut self) {
        if self.state == SessionState::Recording {
            self.state = SessionState::Idle;
            debug!("recording cancelled");
        }
    }

    /// Finish the recording and run transcription, mapping and execution.
    ///
    /// Errors only when no recording is in progress; pipeline failures are
    /// reported through the notifier and yield `Ok(None)`.
    pub async fn finish_recording(&mut self, audio: &[u8]) -> Result<Option<CommandMapping>> {
        if self.state != SessionState::Recording {
            return Err(Error::runtime_with_context(
                "no recording in progress",
                ErrorContext::new()
                    .with_details(format!("{:?}", self.state))
                    .with_source("voice_session"),
            ));
        }

        self.state = SessionState::Transcribing;
        let VoiceSession {
            protocol,
            state,
            mapper,
            transcriber,
            options,
            debug_dir,
            last_transcription,
            ..
        } = self;
        let mut guard = IdleOnDrop(state);

        let transcription = match transcriber.transcribe(audio, options).await {
            Ok(t) => t,
            Err(e) => {
                drop(guard);
                mapper.report_failure("transcribe", &e).await;
                return Ok(None);
            }
        };

        guard.advance(SessionState::Mapping);
        let mapping = map_and_execute(
            mapper,
            *protocol,
            debug_dir.as_deref(),
            last_transcription,
            transcription,
        )
        .await;
        drop(guard);
        Ok(mapping)
    }

    /// Map and execute a transcription produced by the host itself.
    pub async fn handle_transcription(
        &mut self,
        transcription: Transcription,
    ) -> Result<Option<CommandMapping>> {
        if self.state != SessionState::Idle {
            return Err(Error::runtime_with_context(
                "a voice command is already in progress",
                ErrorContext::new()
                    .with_details(format!("{:?}", self.state))
                    .with_source("voice_session"),
            ));
        }

        self.state = SessionState::Mapping;
        let guard = IdleOnDrop(&mut self.state);
        let mapping = map_and_execute(
            &self.mapper,
            self.protocol,
            self.debug_dir.as_deref(),
            &mut self.last_transcription,
            transcription,
        )
        .await;
        drop(guard);
        Ok(mapping)
    }

    /// Notice for hosts that want to confirm what was heard.
    pub fn heard_notice(&self) -> Option<Notice> {
        self.last_transcription
            .as_ref()
            .map(|t| Notice::info(format!("Heard: \"{}\"", t.text.trim())))
    }
}

/// Puts the session back to `Idle` when a cycle ends, including when the
/// caller drops the future mid-await.
struct IdleOnDrop<'a>(&'a mut SessionState);

impl IdleOnDrop<'_> {
    fn advance(&mut self, next: SessionState) {
        *self.0 = next;
    }
}

impl Drop for IdleOnDrop<'_> {
    fn drop(&mut self) {
        if *self.0 != SessionState::Idle {
            debug!(state = ?self.0, "voice cycle ended");
        }
        *self.0 = SessionState::Idle;
    }
}

async fn map_and_execute(
    mapper: &CommandMapper,
    protocol: Protocol,
    debug_dir: Option<&Path>,
    last_transcription: &mut Option<Transcription>,
    transcription: Transcription,
) -> Option<CommandMapping> {
    if let Some(dir) = debug_dir {
        if let Err(e) = crate::debug::write_last_transcription(&transcription, dir) {
            warn!(error = %e, "could not write last transcription");
        }
    }

    let mapping = mapper.map_with(protocol, &transcription).await;
    if mapping.is_none() {
        info!(text = transcription.text.as_str(), "no command for transcription");
    }
    *last_transcription = Some(transcription);

    if let Some(mapping) = &mapping {
        mapper.execute(mapping).await;
    }
    mapping
}
