//! Owned, cancellable timer tasks

use std::future::Future;
use std::sync::Mutex;
use std::time::Duration as StdDuration;

use tokio::task::JoinHandle;

/// Set of spawned timer tasks owned by one component.
///
/// Every task is aborted by `abort_all` or when the set is dropped.
#[derive(Default)]
pub struct TimerSet {
    handles: Mutex<Vec<JoinHandle<()>>>,
}

impl TimerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn a task owned by this set
    pub fn spawn<F>(&self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let handle = tokio::spawn(task);
        let mut handles = self.handles.lock().unwrap_or_else(|e| e.into_inner());
        handles.retain(|h| !h.is_finished());
        handles.push(handle);
    }

    /// Run `task` once after `delay`
    pub fn after<F>(&self, delay: StdDuration, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.spawn(async move {
            tokio::time::sleep(delay).await;
            task.await;
        });
    }

    /// Number of tasks that have not finished yet
    pub fn active(&self) -> usize {
        self.handles
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .filter(|h| !h.is_finished())
            .count()
    }

    /// Abort every pending task
    pub fn abort_all(&self) {
        let handles = std::mem::take(&mut *self.handles.lock().unwrap_or_else(|e| e.into_inner()));
        for handle in handles {
            handle.abort();
        }
    }
}

impl Drop for TimerSet {
    fn drop(&mut self) {
        self.abort_all();
    }
}
