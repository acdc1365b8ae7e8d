//! Infrastructure layer - Adapter implementations
//!
//! Contains concrete implementations of the port interfaces: the JSON
//! record store, desktop notifiers, terminal toasts and the marker-file
//! sync channel.

pub mod config;
pub mod notification;
pub mod store;
pub mod surface;
pub mod sync;

// Re-export adapters
pub use config::XdgConfigStore;
pub use notification::{
    create_notifier, NoOpNotifier, NotifierBackend, NotifyRustNotifier, NotifySendNotifier,
};
pub use store::{JsonFileStore, MemoryStore};
pub use surface::{NullSurface, TerminalSurface};
pub use sync::{MarkerFileSync, NoopSync};
