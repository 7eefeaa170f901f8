//! Session liveness flag.
//!
//! Cleared by Ctrl-C, the exit command, or end of console input. Anything
//! holding a clone can stop the session; the loop notices before its next
//! read, and a pending read is abandoned through [`Liveness::stopped`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::Notify;

#[derive(Debug, Clone)]
pub struct Liveness {
    alive: Arc<AtomicBool>,
    notify: Arc<Notify>,
}

impl Default for Liveness {
    fn default() -> Self {
        Self::new()
    }
}

impl Liveness {
    pub fn new() -> Self {
        Self {
            alive: Arc::new(AtomicBool::new(true)),
            notify: Arc::new(Notify::new()),
        }
    }

    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }

    /// Clear the flag. Safe to call from a signal-handler thread.
    pub fn stop(&self) {
        self.alive.store(false, Ordering::SeqCst);
        self.notify.notify_waiters();
    }

    /// Resolves once [`stop`](Self::stop) has been called.
    pub async fn stopped(&self) {
        loop {
            // Registered before the check so a concurrent stop is not missed.
            let notified = self.notify.notified();
            if !self.is_alive() {
                return;
            }
            notified.await;
        }
    }
}
