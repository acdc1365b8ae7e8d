//! Native notification port interface

use std::fmt;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::notification::{Notification, NotificationId};
use crate::domain::time::Duration;

/// Notification errors
#[derive(Debug, Clone, Error)]
pub enum NotificationError {
    #[error("notify-send not found")]
    NotifySendNotFound,

    #[error("Notification permission request failed: {0}")]
    PermissionFailed(String),

    #[error("Failed to show notification: {0}")]
    SendFailed(String),
}

/// Native notification permission state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Permission {
    /// Not decided yet; a request may be made
    #[default]
    Default,
    Granted,
    Denied,
}

impl Permission {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Granted => "granted",
            Self::Denied => "denied",
        }
    }

    pub const fn is_granted(&self) -> bool {
        matches!(self, Self::Granted)
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What the native notification service is asked to show
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeNotification {
    pub id: NotificationId,
    pub title: String,
    pub body: String,
    pub icon: String,
    /// Replacement tag, unique per record
    pub tag: String,
    /// Stay on screen until the user interacts
    pub require_interaction: bool,
    /// Lifetime when not requiring interaction
    pub timeout: Duration,
}

impl NativeNotification {
    pub fn from_record(notification: &Notification, timeout: Duration) -> Self {
        Self {
            id: notification.id,
            title: notification.title.clone(),
            body: notification.message.clone(),
            icon: notification.icon.clone(),
            tag: format!("notiflow-{}", notification.id),
            require_interaction: notification.persistent,
            timeout,
        }
    }
}

/// Port for native desktop notifications
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Current permission state without prompting.
    fn permission(&self) -> Permission;

    /// Ask for permission to show notifications.
    ///
    /// # Returns
    /// The resulting permission, or an error if the request itself failed
    async fn request_permission(&self) -> Result<Permission, NotificationError>;

    /// Show a native notification.
    ///
    /// # Arguments
    /// * `notification` - What to display
    ///
    /// # Returns
    /// Ok(()) on success, error otherwise
    async fn display(&self, notification: &NativeNotification) -> Result<(), NotificationError>;
}

/// Blanket implementation for boxed notifier types
#[async_trait]
impl Notifier for Box<dyn Notifier> {
    fn permission(&self) -> Permission {
        self.as_ref().permission()
    }

    async fn request_permission(&self) -> Result<Permission, NotificationError> {
        self.as_ref().request_permission().await
    }

    async fn display(&self, notification: &NativeNotification) -> Result<(), NotificationError> {
        self.as_ref().display(notification).await
    }
}
