//! Shutdown signalling for the control loop.
//!
//! Every suspension point (scheduler poll, pipeline backoff, rate-limit wait)
//! sleeps through [`sleep_or_shutdown`] so a single `trigger()` from the CLI's
//! Ctrl-C handler stops the loop promptly instead of after the longest sleep.

use std::time::Duration;

use tokio::sync::watch;

/// Error returned when a sleep was interrupted by shutdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cancelled;

impl std::fmt::Display for Cancelled {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "shutdown requested")
    }
}

impl std::error::Error for Cancelled {}

/// Cloneable shutdown handle. All clones observe the same signal.
#[derive(Debug, Clone)]
pub struct Shutdown {
    tx: std::sync::Arc<watch::Sender<bool>>,
    rx: watch::Receiver<bool>,
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, rx) = watch::channel(false);
        Self {
            tx: std::sync::Arc::new(tx),
            rx,
        }
    }

    /// Request shutdown. Idempotent.
    pub fn trigger(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_triggered(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once shutdown has been requested.
    pub async fn wait(&self) {
        let mut rx = self.rx.clone();
        // Sender lives in self, so wait_for only fails if it is dropped; treat that as shutdown.
        let _ = rx.wait_for(|triggered| *triggered).await;
    }
}

/// Sleep for `d`, returning early with `Err(Cancelled)` if shutdown fires first.
pub async fn sleep_or_shutdown(d: Duration, shutdown: &Shutdown) -> Result<(), Cancelled> {
    if shutdown.is_triggered() {
        return Err(Cancelled);
    }
    tokio::select! {
        _ = tokio::time::sleep(d) => Ok(()),
        _ = shutdown.wait() => Err(Cancelled),
    }
}
