//! notify-send notification adapter

use std::env;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;

use crate::application::ports::{NativeNotification, NotificationError, Notifier, Permission};

use super::notify_rust::APP_NAME;

/// notify-send notification adapter
pub struct NotifySendNotifier {
    /// Application name for notifications
    app_name: String,
}

impl NotifySendNotifier {
    /// Create a new notify-send notifier
    pub fn new() -> Self {
        Self {
            app_name: APP_NAME.to_string(),
        }
    }

    /// Create with custom app name
    pub fn with_app_name(app_name: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
        }
    }

    /// Whether a notify-send binary is on PATH
    fn binary_available() -> bool {
        env::var_os("PATH")
            .map(|paths| env::split_paths(&paths).any(|dir| dir.join("notify-send").is_file()))
            .unwrap_or(false)
    }

    fn build_args(&self, notification: &NativeNotification) -> Vec<String> {
        let expire = if notification.require_interaction {
            0
        } else {
            notification.timeout.as_millis()
        };

        vec![
            "--app-name".to_string(),
            self.app_name.clone(),
            "--icon".to_string(),
            notification.icon.clone(),
            "--expire-time".to_string(),
            expire.to_string(),
            "--hint".to_string(),
            format!("string:x-dunst-stack-tag:{}", notification.tag),
            notification.title.clone(),
            notification.body.clone(),
        ]
    }
}

impl Default for NotifySendNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Notifier for NotifySendNotifier {
    fn permission(&self) -> Permission {
        if Self::binary_available() {
            Permission::Granted
        } else {
            Permission::Denied
        }
    }

    async fn request_permission(&self) -> Result<Permission, NotificationError> {
        Ok(self.permission())
    }

    async fn display(&self, notification: &NativeNotification) -> Result<(), NotificationError> {
        let status = Command::new("notify-send")
            .args(self.build_args(notification))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    NotificationError::NotifySendNotFound
                } else {
                    NotificationError::SendFailed(e.to_string())
                }
            })?;

        if !status.success() {
            return Err(NotificationError::SendFailed(format!(
                "notify-send exited with status: {}",
                status
            )));
        }

        Ok(())
    }
}
