//! Notification infrastructure module
//!
//! Provides cross-platform notification support using notify-rust (primary)
//! or notify-send as fallback.

mod noop;
mod notify_rust;
mod notify_send;

use std::fmt;
use std::str::FromStr;

use tokio::sync::mpsc;

pub use noop::NoOpNotifier;
pub use notify_rust::{NotifyRustNotifier, APP_NAME};
pub use notify_send::NotifySendNotifier;

use crate::application::ports::Notifier;
use crate::domain::notification::NotificationId;

/// Native notification backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NotifierBackend {
    /// Cross-platform notify-rust library (default)
    #[default]
    NotifyRust,
    /// notify-send subprocess
    NotifySend,
    /// Never show native notifications
    None,
}

/// Valid backend names
pub const VALID_NOTIFIERS: &[&str] = &["notify-rust", "notify-send", "none"];

impl NotifierBackend {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NotifyRust => "notify-rust",
            Self::NotifySend => "notify-send",
            Self::None => "none",
        }
    }
}

impl fmt::Display for NotifierBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error type for parsing a backend name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid notifier '{value}'. Valid options: notify-rust, notify-send, none")]
pub struct ParseNotifierError {
    pub value: String,
}

impl FromStr for NotifierBackend {
    type Err = ParseNotifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "notify-rust" => Ok(Self::NotifyRust),
            "notify-send" => Ok(Self::NotifySend),
            "none" => Ok(Self::None),
            _ => Err(ParseNotifierError {
                value: s.to_string(),
            }),
        }
    }
}

/// Create the notifier for a backend.
///
/// Clicks are only reported by the notify-rust backend.
pub fn create_notifier(
    backend: NotifierBackend,
    clicks: Option<mpsc::UnboundedSender<NotificationId>>,
) -> Box<dyn Notifier> {
    match backend {
        NotifierBackend::NotifyRust => {
            let notifier = NotifyRustNotifier::new();
            match clicks {
                Some(sender) => Box::new(notifier.with_click_sender(sender)),
                None => Box::new(notifier),
            }
        }
        NotifierBackend::NotifySend => Box::new(NotifySendNotifier::new()),
        NotifierBackend::None => Box::new(NoOpNotifier::new()),
    }
}
