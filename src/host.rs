//! Host editor boundary: run a named command with an optional argument object.

use crate::{Error, Result};
use async_trait::async_trait;
use std::sync::Mutex;

/// The editor's generic command-invocation facility.
#[async_trait]
pub trait CommandHost: Send + Sync {
    async fn execute_command(&self, command: &str, args: Option<serde_json::Value>) -> Result<()>;
}

/// A command the host was asked to run.
#[derive(Debug, Clone, PartialEq)]
pub struct HostInvocation {
    pub command: String,
    pub args: Option<serde_json::Value>,
}

/// Host that records invocations instead of running them.
///
/// Serves dry runs and tests. Commands listed with [`RecordingHost::failing`]
/// return [`Error::Host`] after being recorded.
#[derive(Default)]
pub struct RecordingHost {
    invocations: Mutex<Vec<HostInvocation>>,
    failing: Vec<String>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(mut self, command: impl Into<String>) -> Self {
        self.failing.push(command.into());
        self
    }

    pub fn invocations(&self) -> Vec<HostInvocation> {
        self.invocations
            .lock()
            .map(|v| v.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl CommandHost for RecordingHost {
    async fn execute_command(&self, command: &str, args: Option<serde_json::Value>) -> Result<()> {
        if let Ok(mut v) = self.invocations.lock() {
            v.push(HostInvocation {
                command: command.to_string(),
                args,
            });
        }
        if self.failing.iter().any(|c| c == command) {
            return Err(Error::Host(format!("command '{}' failed", command)));
        }
        Ok(())
    }
}
