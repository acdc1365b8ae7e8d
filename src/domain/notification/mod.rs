//! Notification domain module

mod export;
mod filter;
mod kind;
mod record;

pub use export::ExportSnapshot;
pub use filter::NotificationFilter;
pub use kind::{NotificationKind, ALL_KINDS};
pub use record::{
    ActionCallback, NewNotification, Notification, NotificationAction, NotificationId,
    DEFAULT_DURATION_MS, DEFAULT_TITLE,
};
