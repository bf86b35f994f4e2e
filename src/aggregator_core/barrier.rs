//! Completion barrier - unblocks once every launched worker has finished

use std::sync::Arc;
use tokio::sync::watch;

/// Counts outstanding workers; `wait` resolves when the count reaches zero.
///
/// The participant count is fixed up front. Each worker holds one
/// [`CompletionGuard`], and dropping the guard marks that worker done, so a
/// worker arrives exactly once whether it returns normally, bails out on an
/// error, or panics.
#[derive(Debug)]
pub struct CompletionBarrier {
    remaining: watch::Sender<usize>,
}

impl CompletionBarrier {
    pub fn new(participants: usize) -> Arc<Self> {
        let (remaining, _) = watch::channel(participants);
        Arc::new(Self { remaining })
    }

    /// Hand out the guard for one participant
    pub fn guard(self: &Arc<Self>) -> CompletionGuard {
        CompletionGuard {
            barrier: Arc::clone(self),
        }
    }

    /// Workers that have not yet arrived
    pub fn remaining(&self) -> usize {
        *self.remaining.borrow()
    }

    /// Wait until every participant has arrived
    pub async fn wait(&self) {
        let mut rx = self.remaining.subscribe();
        // The sender lives as long as `self`, so this cannot observe a closed channel
        if rx.wait_for(|remaining| *remaining == 0).await.is_err() {
            log::error!("Completion barrier dropped while waiting");
        }
    }

    fn arrive(&self) {
        self.remaining.send_modify(|remaining| {
            *remaining = remaining.saturating_sub(1);
        });
    }
}

/// Marks one participant done when dropped
#[derive(Debug)]
pub struct CompletionGuard {
    barrier: Arc<CompletionBarrier>,
}

impl Drop for CompletionGuard {
    fn drop(&mut self) {
        self.barrier.arrive();
    }
}
