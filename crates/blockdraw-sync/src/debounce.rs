//! Delay-and-coalesce scheduling for autosave
//!
//! A [`Debouncer`] owns at most one pending task. Scheduling a new action
//! aborts the pending one, so only the most recent action within the delay
//! window ever runs. Dropping the debouncer aborts any pending task, which
//! is what prevents a stray save after teardown.
//!
//! Cancellation only covers the delay phase. Once the window elapses the
//! action runs detached and can no longer be aborted, so work that has
//! started (an in-flight upload, say) always runs to completion.

use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;

/// An owned, cancellable delayed-action slot
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: Option<JoinHandle<()>>,
}

impl Debouncer {
    /// Create a debouncer with the given delay window
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// The configured delay window
    #[must_use]
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Schedule `action` to run after the delay, replacing any pending action
    pub fn schedule<F>(&mut self, action: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel();
        let delay = self.delay;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // Detach: from here on the action is committed and survives
            // cancellation of this slot.
            tokio::spawn(action);
        }));
    }

    /// Abort the pending action if its delay has not yet elapsed
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    /// True when an action is scheduled and its delay has not yet elapsed
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
