//! Cross-instance sync port interface

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::broadcast;

/// Sync channel errors
#[derive(Debug, Clone, Error)]
pub enum SyncError {
    #[error("Failed to publish sync signal: {0}")]
    PublishFailed(String),
}

/// Signal that another instance changed the shared store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncSignal;

/// Port for telling other running instances that the store changed.
///
/// Advisory only: receivers reload, last write to the store wins.
#[async_trait]
pub trait SyncChannel: Send + Sync {
    /// Announce a local change
    async fn publish(&self) -> Result<(), SyncError>;

    /// Receive changes made by other instances
    fn subscribe(&self) -> broadcast::Receiver<SyncSignal>;
}

#[async_trait]
impl SyncChannel for Box<dyn SyncChannel> {
    async fn publish(&self) -> Result<(), SyncError> {
        self.as_ref().publish().await
    }

    fn subscribe(&self) -> broadcast::Receiver<SyncSignal> {
        self.as_ref().subscribe()
    }
}
