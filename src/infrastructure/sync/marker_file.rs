//! Marker-file sync channel
//!
//! Every publish rewrites `<dir>/notifications_update` with this instance's
//! token and a timestamp. A polling task watches the file and emits a
//! signal whenever another instance rewrote it. A foreign write that this
//! instance overwrites before the next poll is caught by `publish` itself.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration as StdDuration;

use async_trait::async_trait;
use chrono::Utc;
use tokio::fs;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::application::ports::{SyncChannel, SyncError, SyncSignal};

/// Marker file name inside the store directory
pub const MARKER_FILE: &str = "notifications_update";

/// Default poll interval for the marker watcher
pub const DEFAULT_POLL_INTERVAL: StdDuration = StdDuration::from_secs(1);

const CHANNEL_CAPACITY: usize = 16;

/// Sync channel backed by a marker file shared between processes
pub struct MarkerFileSync {
    path: PathBuf,
    token: String,
    poll_interval: StdDuration,
    sender: broadcast::Sender<SyncSignal>,
    /// Last marker contents this instance observed or wrote
    seen: Arc<tokio::sync::Mutex<Option<String>>>,
    watcher: Mutex<Option<JoinHandle<()>>>,
}

impl MarkerFileSync {
    /// Create a channel for the store in `dir`
    pub fn new(dir: impl AsRef<Path>) -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            path: dir.as_ref().join(MARKER_FILE),
            token: Uuid::new_v4().to_string(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            sender,
            seen: Arc::new(tokio::sync::Mutex::new(None)),
            watcher: Mutex::new(None),
        }
    }

    /// Override the poll interval
    pub fn with_poll_interval(mut self, interval: StdDuration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Start polling the marker file. Calling it again is a no-op.
    ///
    /// The watcher is aborted when the channel is dropped.
    pub async fn watch(&self) {
        if self.is_watching() {
            return;
        }

        // Take the baseline before the task starts so a write right after
        // this call is still seen as a change
        {
            let mut seen = self.seen.lock().await;
            *seen = read_marker(&self.path).await;
        }

        let mut watcher = self.watcher.lock().unwrap_or_else(|e| e.into_inner());
        if watcher.as_ref().is_some_and(|h| !h.is_finished()) {
            return;
        }

        let path = self.path.clone();
        let token = self.token.clone();
        let sender = self.sender.clone();
        let seen = Arc::clone(&self.seen);
        let poll_interval = self.poll_interval;

        *watcher = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(poll_interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                let mut known = seen.lock().await;
                let current = read_marker(&path).await;
                if current == *known {
                    continue;
                }

                if let Some(content) = current.as_deref() {
                    if marker_token(content) != Some(token.as_str()) {
                        tracing::debug!(path = %path.display(), "Store changed by another instance");
                        // No receivers is fine
                        let _ = sender.send(SyncSignal);
                    }
                }
                *known = current;
            }
        }));
    }

    fn is_watching(&self) -> bool {
        self.watcher
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .as_ref()
            .is_some_and(|h| !h.is_finished())
    }

    /// Stop the watcher if it is running
    pub fn stop(&self) {
        if let Some(handle) = self
            .watcher
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take()
        {
            handle.abort();
        }
    }
}

impl Drop for MarkerFileSync {
    fn drop(&mut self) {
        self.stop();
    }
}

#[async_trait]
impl SyncChannel for MarkerFileSync {
    async fn publish(&self) -> Result<(), SyncError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| SyncError::PublishFailed(e.to_string()))?;
        }

        let mut seen = self.seen.lock().await;

        // A foreign write not yet polled would be hidden by ours
        if self.is_watching() {
            if let Some(pending) = read_marker(&self.path).await {
                if Some(&pending) != seen.as_ref()
                    && marker_token(&pending) != Some(self.token.as_str())
                {
                    tracing::debug!(path = %self.path.display(), "Store changed by another instance");
                    let _ = self.sender.send(SyncSignal);
                }
            }
        }

        let content = format!("{}\n{}\n", self.token, Utc::now().to_rfc3339());
        fs::write(&self.path, &content)
            .await
            .map_err(|e| SyncError::PublishFailed(e.to_string()))?;
        *seen = Some(content);
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<SyncSignal> {
        self.sender.subscribe()
    }
}

async fn read_marker(path: &Path) -> Option<String> {
    fs::read_to_string(path).await.ok()
}

fn marker_token(content: &str) -> Option<&str> {
    content.lines().next().map(str::trim)
}
