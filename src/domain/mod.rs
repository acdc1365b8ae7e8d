//! Domain layer - Core business logic
//!
//! Contains value objects, entities, and domain errors.
//! This layer has no dependencies on external systems.

pub mod config;
pub mod error;
pub mod notification;
pub mod time;

// Re-export common types
pub use config::AppConfig;
pub use error::*;
pub use notification::{
    ExportSnapshot, NewNotification, Notification, NotificationAction, NotificationFilter,
    NotificationId, NotificationKind,
};
pub use time::Duration;
