//! Toast surface port interface

use thiserror::Error;

use crate::domain::notification::{Notification, NotificationId};

/// Toast rendering errors
#[derive(Debug, Clone, Error)]
pub enum SurfaceError {
    #[error("Failed to render toast: {0}")]
    RenderFailed(String),
}

/// Port for the in-app presentation of notifications (toasts).
///
/// The surface only draws; user interaction flows back through the
/// manager's `dismiss` and `trigger_action`.
pub trait ToastSurface: Send + Sync {
    /// Render a toast for a newly created notification
    fn show(&self, notification: &Notification) -> Result<(), SurfaceError>;

    /// Remove the toast for a notification that became read
    fn dismiss(&self, id: &NotificationId) -> Result<(), SurfaceError>;

    /// Whether the user is currently looking at this surface
    fn has_focus(&self) -> bool;
}

impl ToastSurface for Box<dyn ToastSurface> {
    fn show(&self, notification: &Notification) -> Result<(), SurfaceError> {
        self.as_ref().show(notification)
    }

    fn dismiss(&self, id: &NotificationId) -> Result<(), SurfaceError> {
        self.as_ref().dismiss(id)
    }

    fn has_focus(&self) -> bool {
        self.as_ref().has_focus()
    }
}
