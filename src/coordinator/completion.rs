use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

use tokio::sync::Notify;

#[derive(Debug, Default)]
struct TrackerState {
    remaining: AtomicU64,
    notify: Notify,
}

/// Counts workers that have not yet finished producing results.
///
/// "Finished producing" is signalled by the worker's [`CompletionGuard`] and
/// is independent of whether the worker still holds a connection.
#[derive(Debug, Clone, Default)]
pub struct CompletionTracker {
    state: Arc<TrackerState>,
}

impl CompletionTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one outstanding worker and hands back its guard.
    #[must_use]
    pub fn register(&self) -> CompletionGuard {
        self.state.remaining.fetch_add(1, Ordering::AcqRel);
        CompletionGuard {
            state: Arc::clone(&self.state),
        }
    }

    #[must_use]
    pub fn remaining(&self) -> u64 {
        self.state.remaining.load(Ordering::Acquire)
    }

    /// Resolves once every registered guard has been finished or dropped.
    pub async fn wait_all(&self) {
        loop {
            let notified = self.state.notify.notified();
            if self.remaining() == 0 {
                return;
            }
            notified.await;
        }
    }
}

/// Completion signal for a single worker. Signals exactly once: on
/// [`finish`](Self::finish) or, failing that, on drop (early return, panic,
/// task abort).
#[derive(Debug)]
pub struct CompletionGuard {
    state: Arc<TrackerState>,
}

impl CompletionGuard {
    pub fn finish(self) {
        drop(self);
    }
}

impl Drop for CompletionGuard {
    fn drop(&mut self) {
        loop {
            let current = self.state.remaining.load(Ordering::Acquire);
            let Some(next) = current.checked_sub(1) else {
                break;
            };
            if self
                .state
                .remaining
                .compare_exchange(current, next, Ordering::AcqRel, Ordering::Acquire)
                .is_ok()
            {
                if next == 0 {
                    self.state.notify.notify_waiters();
                }
                break;
            }
        }
    }
}
