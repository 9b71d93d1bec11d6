//! Transient user notifications ("toasts") and confirmation prompts.

use std::sync::{Mutex, PoisonError};

use serde::Serialize;
use tracing::{info, warn};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Success,
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub level: Level,
    pub message: String,
}

pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);

    fn success(&self, message: &str) {
        self.notify(Notification { level: Level::Success, message: message.to_string() });
    }

    fn error(&self, message: &str) {
        self.notify(Notification { level: Level::Error, message: message.to_string() });
    }
}

/// Writes notifications to the log only.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, n: Notification) {
        match n.level {
            Level::Success => info!(event = "notify", message = %n.message, "success"),
            Level::Error => warn!(event = "notify", message = %n.message, "error"),
        }
    }
}

/// Collects notifications so a caller can hand them back with its response.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    items: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take(&self) -> Vec<Notification> {
        std::mem::take(&mut *self.items.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, n: Notification) {
        LogNotifier.notify(n.clone());
        self.items.lock().unwrap_or_else(PoisonError::into_inner).push(n);
    }
}

/// Explicit user confirmation before a destructive action.
pub trait Confirm: Send + Sync {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}
