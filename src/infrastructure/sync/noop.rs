//! Sync channel for a single instance

use async_trait::async_trait;
use tokio::sync::broadcast;

use crate::application::ports::{SyncChannel, SyncError, SyncSignal};

/// Sync channel that never publishes or receives anything
pub struct NoopSync {
    // Held so subscribers stay open instead of seeing `Closed`
    sender: broadcast::Sender<SyncSignal>,
}

impl NoopSync {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(1);
        Self { sender }
    }
}

impl Default for NoopSync {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SyncChannel for NoopSync {
    async fn publish(&self) -> Result<(), SyncError> {
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<SyncSignal> {
        self.sender.subscribe()
    }
}
