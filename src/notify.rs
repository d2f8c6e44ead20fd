//! User-visible, non-blocking notices.
//!
//! The mapper never raises to the host. Instead each failure is logged and
//! reported once through a [`Notifier`], which the host renders however it
//! likes (toast, status bar, output channel).
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`Notice`] | A single notice with severity and message |
//! | [`Notifier`] | Trait for notice destinations |
//! | [`NoopNotifier`] | Drops every notice |
//! | [`TracingNotifier`] | Emits notices as tracing events |
//! | [`InMemoryNotifier`] | Keeps notices in memory, for tests and polling hosts |
//! | [`CompositeNotifier`] | Fans out to several destinations |

use crate::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock};
use std::time::{SystemTime, UNIX_EPOCH};

fn timestamp() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    pub timestamp: f64,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Info, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Warning, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Error, message)
    }

    fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            timestamp: timestamp(),
        }
    }
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, notice: Notice) -> Result<()>;
}

/// No-op notifier (always available).
pub struct NoopNotifier;

#[async_trait]
impl Notifier for NoopNotifier {
    async fn notify(&self, _: Notice) -> Result<()> {
        Ok(())
    }
}

/// Returns a no-op notifier.
pub fn noop_notifier() -> Arc<dyn Notifier> {
    Arc::new(NoopNotifier)
}

/// Logs notices through `tracing`; useful for headless hosts.
#[derive(Default)]
pub struct TracingNotifier;

#[async_trait]
impl Notifier for TracingNotifier {
    async fn notify(&self, notice: Notice) -> Result<()> {
        match notice.level {
            NoticeLevel::Info => tracing::info!(notice = notice.message.as_str(), "user notice"),
            NoticeLevel::Warning => tracing::warn!(notice = notice.message.as_str(), "user notice"),
            NoticeLevel::Error => tracing::error!(notice = notice.message.as_str(), "user notice"),
        }
        Ok(())
    }
}

/// In-memory notifier with a bounded buffer.
pub struct InMemoryNotifier {
    notices: Arc<RwLock<Vec<Notice>>>,
    max_notices: usize,
}

impl InMemoryNotifier {
    pub fn new(max: usize) -> Self {
        Self {
            notices: Arc::new(RwLock::new(Vec::new())),
            max_notices: max.max(1),
        }
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices
            .read()
            .map(|n| n.clone())
            .unwrap_or_default()
    }

    pub fn errors(&self) -> Vec<Notice> {
        self.notices()
            .into_iter()
            .filter(|n| n.level == NoticeLevel::Error)
            .collect()
    }

    pub fn clear(&self) {
        if let Ok(mut n) = self.notices.write() {
            n.clear();
        }
    }

    pub fn len(&self) -> usize {
        self.notices.read().map(|n| n.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryNotifier {
    fn default() -> Self {
        Self::new(100)
    }
}

#[async_trait]
impl Notifier for InMemoryNotifier {
    async fn notify(&self, notice: Notice) -> Result<()> {
        if let Ok(mut notices) = self.notices.write() {
            notices.push(notice);
            if notices.len() > self.max_notices {
                notices.remove(0);
            }
        }
        Ok(())
    }
}

/// Composite notifier for multiple destinations.
#[derive(Default)]
pub struct CompositeNotifier {
    targets: Vec<Arc<dyn Notifier>>,
}

impl CompositeNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(mut self, target: Arc<dyn Notifier>) -> Self {
        self.targets.push(target);
        self
    }
}

#[async_trait]
impl Notifier for CompositeNotifier {
    async fn notify(&self, notice: Notice) -> Result<()> {
        for t in &self.targets {
            let _ = t.notify(notice.clone()).await;
        }
        Ok(())
    }
}
