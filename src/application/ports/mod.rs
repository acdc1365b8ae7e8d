//! Port interfaces (traits) for external systems
//!
//! These traits define the boundaries between the application
//! and infrastructure layers.

pub mod config;
pub mod notifier;
pub mod store;
pub mod surface;
pub mod sync;

// Re-export common types
pub use config::ConfigStore;
pub use notifier::{NativeNotification, NotificationError, Notifier, Permission};
pub use store::{RecordStore, StoreError};
pub use surface::{SurfaceError, ToastSurface};
pub use sync::{SyncChannel, SyncError, SyncSignal};
