//! Strategy selection and the `TrafficCounter` entry point

use super::channel::DEFAULT_CHANNEL_CAPACITY;
use super::diagnostics::{CountingSink, DiagnosticSink};
use super::reader::SourceReader;
use super::worker::ScanContext;
use super::{atomic, channel, mutex};
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// How concurrent match signals are combined into one total
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    Atomic,
    Channel,
    Mutex,
}

impl Strategy {
    pub fn all() -> [Strategy; 3] {
        [Strategy::Atomic, Strategy::Channel, Strategy::Mutex]
    }

    pub fn label(&self) -> &'static str {
        match self {
            Strategy::Atomic => "atomic",
            Strategy::Channel => "channel",
            Strategy::Mutex => "mutex",
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownStrategy(pub String);

impl std::fmt::Display for UnknownStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Unknown strategy '{}' (expected atomic, channel or mutex)", self.0)
    }
}

impl std::error::Error for UnknownStrategy {}

impl FromStr for Strategy {
    type Err = UnknownStrategy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "atomic" => Ok(Strategy::Atomic),
            "channel" => Ok(Strategy::Channel),
            "mutex" => Ok(Strategy::Mutex),
            _ => Err(UnknownStrategy(s.to_string())),
        }
    }
}

/// Outcome of one strategy run
#[derive(Debug, Clone)]
pub struct RunReport {
    pub strategy: Strategy,
    pub total: u64,
    pub sources: usize,
    pub diagnostics: usize,
    pub elapsed: Duration,
}

/// Counts TCP traffic across sources with a chosen aggregation strategy
#[derive(Clone)]
pub struct TrafficCounter {
    reader: Arc<dyn SourceReader>,
    sink: Arc<dyn DiagnosticSink>,
    channel_capacity: usize,
}

impl TrafficCounter {
    pub fn new(reader: Arc<dyn SourceReader>, sink: Arc<dyn DiagnosticSink>) -> Self {
        Self {
            reader,
            sink,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }

    /// Buffer size for the channel strategy (raised to at least 1)
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        self.channel_capacity = capacity;
        self
    }

    pub fn channel_capacity(&self) -> usize {
        self.channel_capacity
    }

    /// Total TCP records across `sources`
    pub async fn count(&self, strategy: Strategy, sources: &[PathBuf]) -> u64 {
        let ctx = ScanContext::new(Arc::clone(&self.reader), Arc::clone(&self.sink));
        count_with(&ctx, strategy, sources, self.channel_capacity).await
    }

    /// Like [`count`](Self::count), also timing the run and tallying its diagnostics
    pub async fn run(&self, strategy: Strategy, sources: &[PathBuf]) -> RunReport {
        let sink = Arc::new(CountingSink::new(Arc::clone(&self.sink)));
        let ctx = ScanContext::new(Arc::clone(&self.reader), sink.clone());

        let started = Instant::now();
        let total = count_with(&ctx, strategy, sources, self.channel_capacity).await;
        let report = RunReport {
            strategy,
            total,
            sources: sources.len(),
            diagnostics: sink.reported(),
            elapsed: started.elapsed(),
        };

        log::info!(
            "📊 {}: {} TCP records across {} sources ({} errors, {:?})",
            report.strategy,
            report.total,
            report.sources,
            report.diagnostics,
            report.elapsed
        );
        report
    }

    /// Run every strategy, one after another, against the same sources
    pub async fn run_all(&self, sources: &[PathBuf]) -> Vec<RunReport> {
        let mut reports = Vec::with_capacity(3);
        for strategy in Strategy::all() {
            reports.push(self.run(strategy, sources).await);
        }
        reports
    }
}

async fn count_with(
    ctx: &ScanContext,
    strategy: Strategy,
    sources: &[PathBuf],
    channel_capacity: usize,
) -> u64 {
    match strategy {
        Strategy::Atomic => atomic::count(ctx, sources).await,
        Strategy::Channel => channel::count(ctx, sources, channel_capacity).await,
        Strategy::Mutex => mutex::count(ctx, sources).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator_core::diagnostics::CollectingSink;
    use crate::aggregator_core::reader::MemorySourceReader;

    #[test]
    fn test_strategy_parsing() {
        assert_eq!("atomic".parse::<Strategy>().unwrap(), Strategy::Atomic);
        assert_eq!(" Channel ".parse::<Strategy>().unwrap(), Strategy::Channel);
        assert_eq!("MUTEX".parse::<Strategy>().unwrap(), Strategy::Mutex);
        assert!("rwlock".parse::<Strategy>().is_err());
    }

    #[test]
    fn test_labels_in_run_order() {
        let labels: Vec<_> = Strategy::all().iter().map(|s| s.label()).collect();
        assert_eq!(labels, vec!["atomic", "channel", "mutex"]);
    }

    #[tokio::test]
    async fn test_run_reports_diagnostics() {
        let reader = MemorySourceReader::new()
            .with_source("good.json", r#"{"proto":"TCP"}"#)
            .with_source("bad.json", r#"{"proto":"TCP"} not-json"#);
        let sink = Arc::new(CollectingSink::new());
        let counter = TrafficCounter::new(Arc::new(reader), sink.clone());
        let sources = vec![
            PathBuf::from("good.json"),
            PathBuf::from("bad.json"),
            PathBuf::from("missing.json"),
        ];

        let reports = counter.run_all(&sources).await;

        assert_eq!(reports.len(), 3);
        for report in &reports {
            assert_eq!(report.total, 2, "{} total", report.strategy);
            assert_eq!(report.sources, 3);
            assert_eq!(report.diagnostics, 2, "{} diagnostics", report.strategy);
        }
        // bad.json + missing.json, once per strategy
        assert_eq!(sink.len(), 6);
    }

    #[test]
    fn test_default_channel_capacity() {
        let counter = TrafficCounter::new(
            Arc::new(MemorySourceReader::new()),
            Arc::new(CollectingSink::new()),
        );
        assert_eq!(counter.channel_capacity(), DEFAULT_CHANNEL_CAPACITY);
        assert_eq!(counter.with_channel_capacity(64).channel_capacity(), 64);
    }
}
