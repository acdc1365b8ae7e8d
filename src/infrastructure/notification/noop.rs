//! No-op notification adapter

use async_trait::async_trait;

use crate::application::ports::{NativeNotification, NotificationError, Notifier, Permission};

/// Notifier that never shows anything
///
/// Used when native notifications are disabled or no backend exists.
pub struct NoOpNotifier;

impl NoOpNotifier {
    pub fn new() -> Self {
        Self
    }
}

impl Default for NoOpNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Notifier for NoOpNotifier {
    fn permission(&self) -> Permission {
        Permission::Denied
    }

    async fn request_permission(&self) -> Result<Permission, NotificationError> {
        Ok(Permission::Denied)
    }

    async fn display(&self, _notification: &NativeNotification) -> Result<(), NotificationError> {
        Ok(())
    }
}
