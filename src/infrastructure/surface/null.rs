//! Surface that draws nothing

use crate::application::ports::{SurfaceError, ToastSurface};
use crate::domain::notification::{Notification, NotificationId};

/// Headless surface for one-shot commands and tests. Never focused.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSurface;

impl NullSurface {
    pub fn new() -> Self {
        Self
    }
}

impl ToastSurface for NullSurface {
    fn show(&self, _notification: &Notification) -> Result<(), SurfaceError> {
        Ok(())
    }

    fn dismiss(&self, _id: &NotificationId) -> Result<(), SurfaceError> {
        Ok(())
    }

    fn has_focus(&self) -> bool {
        false
    }
}
