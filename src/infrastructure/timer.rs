//! Cancellable timers backing the debounce rules

use std::future::Future;
use std::sync::Mutex;
use std::time::Duration;
use tokio::task::JoinHandle;

/// A single pending-action slot. Scheduling replaces any timer already
/// pending in the slot, so at most the most recent action of a class
/// can fire (last-edit-wins).
#[derive(Debug, Default)]
pub struct Debouncer {
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl Debouncer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `action` to run after `delay`, replacing any pending
    /// timer in this slot. A zero delay still goes through the timer
    /// queue so cancellation semantics stay uniform.
    pub fn schedule<F>(&self, delay: Duration, action: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            action.await;
        });

        let mut slot = self.pending.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(prev) = slot.replace(handle) {
            prev.abort();
        }
    }

    /// Drop any pending timer without firing it
    pub fn cancel(&self) {
        let mut slot = self.pending.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(prev) = slot.take() {
            prev.abort();
        }
    }
}
