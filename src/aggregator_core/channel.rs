//! Channel strategy - workers send one unit signal per match
//!
//! ```text
//! worker ─┐
//! worker ─┼─ mpsc<()> ──→ aggregator recv loop (runs while workers send)
//! worker ─┘      ↑
//!          watcher: barrier.wait() → drop(original sender)
//! ```
//!
//! The receive loop starts as soon as the workers are spawned. With a small
//! buffer every send waits for the aggregator to take the previous signal, so
//! draining only after all producers finish would deadlock.

use super::barrier::CompletionBarrier;
use super::worker::{spawn_worker, MatchSignal, ScanContext};
use async_trait::async_trait;
use std::path::PathBuf;
use tokio::sync::mpsc;

/// Smallest buffer tokio's bounded channel accepts; the closest thing to a rendezvous channel
pub const MIN_CHANNEL_CAPACITY: usize = 1;

pub const DEFAULT_CHANNEL_CAPACITY: usize = MIN_CHANNEL_CAPACITY;

struct SignalSender(mpsc::Sender<()>);

#[async_trait]
impl MatchSignal for SignalSender {
    async fn signal(&self) {
        if self.0.send(()).await.is_err() {
            log::warn!("Signal channel closed, match dropped");
        }
    }
}

/// Count TCP records across `sources`, one worker per source.
///
/// `capacity` below [`MIN_CHANNEL_CAPACITY`] is raised to it.
pub async fn count(ctx: &ScanContext, sources: &[PathBuf], capacity: usize) -> u64 {
    let (tx, mut rx) = mpsc::channel::<()>(capacity.max(MIN_CHANNEL_CAPACITY));
    let barrier = CompletionBarrier::new(sources.len());

    for source in sources {
        spawn_worker(
            ctx.clone(),
            source.clone(),
            SignalSender(tx.clone()),
            barrier.guard(),
        );
    }

    // Watcher: the channel closes once this sender and every worker's clone are gone
    tokio::spawn(async move {
        barrier.wait().await;
        drop(tx);
        log::debug!("All workers finished, closing signal channel");
    });

    let mut total = 0;
    while rx.recv().await.is_some() {
        total += 1;
    }
    total
}
