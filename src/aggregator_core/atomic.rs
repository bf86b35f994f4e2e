//! Atomic strategy - workers fetch-and-add on one shared counter

use super::barrier::CompletionBarrier;
use super::worker::{spawn_worker, MatchSignal, ScanContext};
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

struct AtomicTally(Arc<AtomicU64>);

#[async_trait]
impl MatchSignal for AtomicTally {
    async fn signal(&self) {
        self.0.fetch_add(1, Ordering::Relaxed);
    }
}

/// Count TCP records across `sources`, one worker per source.
///
/// Workers never block on aggregation. The counter is read only after the
/// completion barrier, which also orders the final load after every increment.
pub async fn count(ctx: &ScanContext, sources: &[PathBuf]) -> u64 {
    let counter = Arc::new(AtomicU64::new(0));
    let barrier = CompletionBarrier::new(sources.len());

    for source in sources {
        spawn_worker(
            ctx.clone(),
            source.clone(),
            AtomicTally(Arc::clone(&counter)),
            barrier.guard(),
        );
    }

    barrier.wait().await;
    counter.load(Ordering::Relaxed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator_core::diagnostics::CollectingSink;
    use crate::aggregator_core::reader::MemorySourceReader;

    #[tokio::test]
    async fn test_atomic_count() {
        let reader = MemorySourceReader::new()
            .with_source("a.json", r#"{"proto":"TCP"} {"proto":"UDP"}"#)
            .with_source("b.json", r#"{"proto":"TCP"} {"proto":"TCP"}"#);
        let ctx = ScanContext::new(Arc::new(reader), Arc::new(CollectingSink::new()));

        let total = count(&ctx, &[PathBuf::from("a.json"), PathBuf::from("b.json")]).await;
        assert_eq!(total, 3);
    }

    #[tokio::test]
    async fn test_atomic_no_sources() {
        let ctx = ScanContext::new(
            Arc::new(MemorySourceReader::new()),
            Arc::new(CollectingSink::new()),
        );

        assert_eq!(count(&ctx, &[]).await, 0);
    }
}
