//! Graceful shutdown signal.
//!
//! Backed by a `watch` channel holding a single flag, so a task that starts
//! waiting after the trigger still observes it.

use tokio::sync::watch;

/// Cloneable shutdown handle shared by the signal handler and the server.
#[derive(Debug, Clone)]
pub struct Shutdown {
    flag: watch::Sender<bool>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (flag, _) = watch::channel(false);
        Self { flag }
    }

    /// Request shutdown. Repeated calls are harmless.
    pub fn trigger(&self) {
        self.flag.send_replace(true);
    }

    pub fn is_triggered(&self) -> bool {
        *self.flag.borrow()
    }

    /// Resolve once [`trigger`](Self::trigger) has been called.
    pub async fn signalled(&self) {
        let mut rx = self.flag.subscribe();
        // The sender lives in `self`, so the channel cannot close here.
        let _ = rx.wait_for(|triggered| *triggered).await;
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
