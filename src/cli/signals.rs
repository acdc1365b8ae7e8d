//! Signal handling for the watch runner

use colored::Colorize;
use tokio::signal::unix::{signal, SignalKind};
use tokio::sync::mpsc;

/// Signals the watch loop reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchSignal {
    /// Reload from the store (SIGHUP)
    Reload,
    /// Stop watching (SIGINT/SIGTERM)
    Shutdown,
}

/// Watch signal handler
///
/// Forwards OS signals into a channel consumed by the watch loop.
pub struct WatchSignalHandler {
    receiver: mpsc::Receiver<WatchSignal>,
}

impl WatchSignalHandler {
    /// Install handlers for SIGINT, SIGTERM and SIGHUP
    pub async fn new() -> Result<Self, std::io::Error> {
        let (tx, rx) = mpsc::channel(10);

        let tx_int = tx.clone();
        let mut sigint = signal(SignalKind::interrupt())?;
        tokio::spawn(async move {
            sigint.recv().await;
            eprintln!("{} Received SIGINT (shutdown)", "↓".cyan());
            let _ = tx_int.send(WatchSignal::Shutdown).await;
        });

        let tx_term = tx.clone();
        let mut sigterm = signal(SignalKind::terminate())?;
        tokio::spawn(async move {
            sigterm.recv().await;
            eprintln!("{} Received SIGTERM (shutdown)", "↓".cyan());
            let _ = tx_term.send(WatchSignal::Shutdown).await;
        });

        let mut sighup = signal(SignalKind::hangup())?;
        tokio::spawn(async move {
            while sighup.recv().await.is_some() {
                if tx.send(WatchSignal::Reload).await.is_err() {
                    break;
                }
            }
        });

        Ok(Self { receiver: rx })
    }

    /// Wait for the next signal
    pub async fn recv(&mut self) -> Option<WatchSignal> {
        self.receiver.recv().await
    }
}
