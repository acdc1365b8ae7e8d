//! Application layer - Use cases and port interfaces
//!
//! Contains the notification manager and trait definitions
//! for external system interactions.

pub mod events;
pub mod manager;
pub mod ports;
pub mod simulation;
pub mod timers;

// Re-export use cases
pub use events::{ListenerError, ListenerId, NotificationEvent};
pub use manager::{
    ManagerConfig, ManagerError, NotificationManager, SimulationSettings,
    NOTIFICATIONS_COLLECTION,
};
pub use simulation::{Activity, ActivitySimulator, ACTIVITY_CATALOG};
