//! Mutex strategy - workers increment a lock-guarded counter

use super::barrier::CompletionBarrier;
use super::worker::{spawn_worker, MatchSignal, ScanContext};
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

/// A count that can only be touched while holding its lock
#[derive(Debug, Default)]
pub struct GuardedCounter {
    count: Mutex<u64>,
}

impl GuardedCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one and return the new value
    pub fn increment(&self) -> u64 {
        let mut count = self.lock();
        *count += 1;
        *count
    }

    pub fn value(&self) -> u64 {
        *self.lock()
    }

    // A panic cannot leave a half-applied increment, so a poisoned lock is still usable
    fn lock(&self) -> MutexGuard<'_, u64> {
        self.count
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

struct MutexTally(Arc<GuardedCounter>);

#[async_trait]
impl MatchSignal for MutexTally {
    async fn signal(&self) {
        self.0.increment();
    }
}

/// Count TCP records across `sources`, one worker per source.
pub async fn count(ctx: &ScanContext, sources: &[PathBuf]) -> u64 {
    let counter = Arc::new(GuardedCounter::new());
    let barrier = CompletionBarrier::new(sources.len());

    for source in sources {
        spawn_worker(
            ctx.clone(),
            source.clone(),
            MutexTally(Arc::clone(&counter)),
            barrier.guard(),
        );
    }

    barrier.wait().await;
    counter.value()
}
