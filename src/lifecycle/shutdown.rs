//! Shutdown coordination for the adapter.

use tokio::sync::broadcast;

/// Why the adapter is shutting down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownReason {
    /// SIGINT / SIGTERM.
    Signal,
    /// The launched invoker process exited on its own.
    InvokerExited,
}

/// Coordinator for graceful shutdown.
///
/// Long-running tasks subscribe and stop once the first reason is broadcast.
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Subscribe to the shutdown signal.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Notify every subscriber.
    pub fn trigger(&self, reason: ShutdownReason) {
        tracing::info!(?reason, subscribers = self.tx.receiver_count(), "Shutting down");
        let _ = self.tx.send(());
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
