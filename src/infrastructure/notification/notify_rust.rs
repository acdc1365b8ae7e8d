//! Cross-platform notification adapter using notify-rust
//!
//! Works on Windows, macOS, and Linux. On freedesktop systems clicks on a
//! notification can be forwarded back to the manager. Each forwarded
//! notification keeps a thread blocked until it is clicked or closed, so at
//! most `MAX_CLICK_WATCHERS` are tracked at once; beyond that, notifications
//! are shown without click forwarding.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use notify_rust::Timeout;
use tokio::sync::{mpsc, oneshot};

use crate::application::ports::{NativeNotification, NotificationError, Notifier, Permission};
use crate::domain::notification::NotificationId;

/// Application name shown by the notification server
pub const APP_NAME: &str = "Notiflow";

/// Upper bound on notifications waiting for a click at the same time
pub const MAX_CLICK_WATCHERS: usize = 16;

/// Occupied click-watcher slot, released on drop
struct WatcherSlot(Arc<AtomicUsize>);

impl WatcherSlot {
    fn acquire(active: &Arc<AtomicUsize>) -> Option<Self> {
        active
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| {
                (n < MAX_CLICK_WATCHERS).then_some(n + 1)
            })
            .ok()
            .map(|_| Self(Arc::clone(active)))
    }
}

impl Drop for WatcherSlot {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Cross-platform notifier using notify-rust
pub struct NotifyRustNotifier {
    /// Application name for notifications
    app_name: String,
    /// Receives ids of clicked notifications
    clicks: Option<mpsc::UnboundedSender<NotificationId>>,
    /// Threads currently waiting for a click
    watchers: Arc<AtomicUsize>,
}

impl NotifyRustNotifier {
    /// Create a new notify-rust notifier
    pub fn new() -> Self {
        Self {
            app_name: APP_NAME.to_string(),
            clicks: None,
            watchers: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Create with custom app name
    pub fn with_app_name(app_name: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
            clicks: None,
            watchers: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Forward clicked notification ids to `sender`
    pub fn with_click_sender(mut self, sender: mpsc::UnboundedSender<NotificationId>) -> Self {
        self.clicks = Some(sender);
        self
    }

    fn builder(&self, notification: &NativeNotification, clickable: bool) -> notify_rust::Notification {
        let mut builder = notify_rust::Notification::new();
        builder
            .appname(&self.app_name)
            .summary(&notification.title)
            .body(&notification.body)
            .icon(&notification.icon)
            .timeout(Self::timeout_for(notification));
        if clickable {
            builder.action("default", "Open");
        }
        builder
    }

    fn timeout_for(notification: &NativeNotification) -> Timeout {
        if notification.require_interaction {
            Timeout::Never
        } else {
            let ms = u32::try_from(notification.timeout.as_millis()).unwrap_or(u32::MAX);
            Timeout::Milliseconds(ms)
        }
    }
}

impl Default for NotifyRustNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(all(unix, not(target_os = "macos")))]
fn forward_clicks(
    handle: notify_rust::NotificationHandle,
    id: NotificationId,
    clicks: Option<mpsc::UnboundedSender<NotificationId>>,
) {
    if let Some(clicks) = clicks {
        handle.wait_for_action(|action| {
            if action == "default" {
                let _ = clicks.send(id);
            }
        });
    }
}

#[cfg(not(all(unix, not(target_os = "macos"))))]
fn forward_clicks<H>(
    _handle: H,
    _id: NotificationId,
    _clicks: Option<mpsc::UnboundedSender<NotificationId>>,
) {
}

#[async_trait]
impl Notifier for NotifyRustNotifier {
    fn permission(&self) -> Permission {
        // Freedesktop needs a running notification server; probe on request
        if cfg!(all(unix, not(target_os = "macos"))) {
            Permission::Default
        } else {
            Permission::Granted
        }
    }

    async fn request_permission(&self) -> Result<Permission, NotificationError> {
        #[cfg(all(unix, not(target_os = "macos")))]
        {
            let info = tokio::task::spawn_blocking(notify_rust::get_server_information)
                .await
                .map_err(|e| NotificationError::PermissionFailed(format!("Task join error: {}", e)))?
                .map_err(|e| NotificationError::PermissionFailed(e.to_string()))?;
            tracing::debug!(server = %info.name, "Notification server available");
            Ok(Permission::Granted)
        }

        #[cfg(not(all(unix, not(target_os = "macos"))))]
        {
            Ok(Permission::Granted)
        }
    }

    async fn display(&self, notification: &NativeNotification) -> Result<(), NotificationError> {
        let watcher = match &self.clicks {
            Some(clicks) => match WatcherSlot::acquire(&self.watchers) {
                Some(slot) => Some((clicks.clone(), slot)),
                None => {
                    tracing::debug!(id = %notification.id, "Click watcher limit reached, clicks not forwarded");
                    None
                }
            },
            None => None,
        };

        let builder = self.builder(notification, watcher.is_some());
        let id = notification.id;

        let Some((clicks, slot)) = watcher else {
            return tokio::task::spawn_blocking(move || builder.show().map(drop))
                .await
                .map_err(|e| NotificationError::SendFailed(format!("Task join error: {}", e)))?
                .map_err(|e| NotificationError::SendFailed(e.to_string()));
        };

        // Detached so a pending wait never holds up runtime shutdown
        let (result_tx, result_rx) = oneshot::channel();
        std::thread::spawn(move || {
            let _slot = slot;
            match builder.show() {
                Ok(handle) => {
                    let _ = result_tx.send(Ok(()));
                    forward_clicks(handle, id, Some(clicks));
                }
                Err(e) => {
                    let _ = result_tx.send(Err(NotificationError::SendFailed(e.to_string())));
                }
            }
        });

        result_rx
            .await
            .map_err(|_| NotificationError::SendFailed("notification thread exited".to_string()))?
    }
}
