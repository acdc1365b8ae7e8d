//! Notification kind value object

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::error::InvalidKindError;

/// All notification kinds
pub const ALL_KINDS: &[NotificationKind] = &[
    NotificationKind::Success,
    NotificationKind::Error,
    NotificationKind::Warning,
    NotificationKind::Info,
];

/// Severity of a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
    Warning,
    #[default]
    Info,
}

impl NotificationKind {
    /// Freedesktop icon name used when a notification has no explicit icon
    pub const fn default_icon(&self) -> &'static str {
        match self {
            Self::Success => "dialog-ok",
            Self::Error => "dialog-error",
            Self::Warning => "dialog-warning",
            Self::Info => "dialog-information",
        }
    }

    /// Get the string identifier for this kind
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }
}

impl FromStr for NotificationKind {
    type Err = InvalidKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "success" => Ok(Self::Success),
            "error" => Ok(Self::Error),
            "warning" => Ok(Self::Warning),
            "info" => Ok(Self::Info),
            _ => Err(InvalidKindError { input: s.to_string() }),
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
