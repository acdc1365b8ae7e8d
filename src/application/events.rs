//! Notification events and the subscriber registry

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use thiserror::Error;

use crate::domain::notification::Notification;

/// Event broadcast to subscribers
#[derive(Debug, Clone, PartialEq)]
pub enum NotificationEvent {
    /// A notification was created
    Created(Notification),
    /// A notification was marked as read
    Read(Notification),
    /// The list was reloaded after another instance changed the store
    Sync,
}

impl NotificationEvent {
    /// The notification carried by the event, if any
    pub fn notification(&self) -> Option<&Notification> {
        match self {
            Self::Created(n) | Self::Read(n) => Some(n),
            Self::Sync => None,
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Created(_) => "created",
            Self::Read(_) => "read",
            Self::Sync => "sync",
        }
    }
}

/// Error returned by a failing listener
#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct ListenerError(pub String);

impl ListenerError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Subscriber callback
pub type Listener = Arc<dyn Fn(&NotificationEvent) -> Result<(), ListenerError> + Send + Sync>;

/// Handle returned by `add`, used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Set of subscriber callbacks.
///
/// A failing or panicking listener is logged and skipped; the rest still
/// receive the event.
#[derive(Default)]
pub struct ListenerRegistry {
    next_id: AtomicU64,
    listeners: Mutex<Vec<(ListenerId, Listener)>>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback
    pub fn add(&self, listener: Listener) -> ListenerId {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::SeqCst));
        self.listeners
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push((id, listener));
        id
    }

    /// Unregister a callback. Returns false if it was not registered.
    pub fn remove(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.lock().unwrap_or_else(|e| e.into_inner());
        let before = listeners.len();
        listeners.retain(|(lid, _)| *lid != id);
        listeners.len() != before
    }

    pub fn len(&self) -> usize {
        self.listeners.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Deliver an event to every listener.
    ///
    /// Returns the number of listeners that handled it without error.
    pub fn broadcast(&self, event: &NotificationEvent) -> usize {
        // Snapshot so callbacks may add or remove listeners
        let snapshot: Vec<(ListenerId, Listener)> = self
            .listeners
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone();

        let mut delivered = 0;
        for (id, listener) in snapshot {
            match panic::catch_unwind(AssertUnwindSafe(|| listener(event))) {
                Ok(Ok(())) => delivered += 1,
                Ok(Err(e)) => {
                    tracing::error!(listener = id.0, event = event.as_str(), "Notification listener error: {}", e);
                }
                Err(payload) => {
                    tracing::error!(
                        listener = id.0,
                        event = event.as_str(),
                        "Notification listener panicked: {}",
                        panic_message(payload.as_ref())
                    );
                }
            }
        }
        delivered
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
