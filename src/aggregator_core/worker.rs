//! Per-source worker shared by every aggregation strategy
//!
//! A worker reads one source, decodes its records in sequence and fires the
//! strategy's [`MatchSignal`] once per TCP record. Read and decode failures go
//! to the [`DiagnosticSink`]; a decode failure ends the scan of that source but
//! keeps whatever was already signalled.

use super::barrier::CompletionGuard;
use super::diagnostics::DiagnosticSink;
use super::errors::ScanError;
use super::reader::SourceReader;
use crate::traffic::Traffic;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Strategy-specific action taken for every matching record
#[async_trait]
pub trait MatchSignal: Send + Sync {
    async fn signal(&self);
}

/// Collaborators shared by all workers of a run
#[derive(Clone)]
pub struct ScanContext {
    pub reader: Arc<dyn SourceReader>,
    pub sink: Arc<dyn DiagnosticSink>,
}

impl ScanContext {
    pub fn new(reader: Arc<dyn SourceReader>, sink: Arc<dyn DiagnosticSink>) -> Self {
        Self { reader, sink }
    }
}

/// Scan one source, signalling each match; returns the number of matches signalled
pub async fn scan_source<S>(
    reader: &dyn SourceReader,
    sink: &dyn DiagnosticSink,
    source: &Path,
    signal: &S,
) -> usize
where
    S: MatchSignal + ?Sized,
{
    let bytes = match reader.read(source).await {
        Ok(bytes) => bytes,
        Err(e) => {
            sink.report(source, &ScanError::from(e));
            return 0;
        }
    };

    let mut matches = 0;
    let records = serde_json::Deserializer::from_slice(&bytes).into_iter::<Traffic>();
    for record in records {
        match record {
            Ok(traffic) => {
                if traffic.is_tcp() {
                    signal.signal().await;
                    matches += 1;
                }
            }
            Err(e) => {
                sink.report(source, &ScanError::from(e));
                break;
            }
        }
    }

    matches
}

/// Launch a worker task for `source`; `guard` is released once the scan is over
pub fn spawn_worker<S>(
    ctx: ScanContext,
    source: PathBuf,
    signal: S,
    guard: CompletionGuard,
) -> JoinHandle<usize>
where
    S: MatchSignal + 'static,
{
    tokio::spawn(async move {
        log::debug!("Worker started: {}", source.display());
        let matches = scan_source(ctx.reader.as_ref(), ctx.sink.as_ref(), &source, &signal).await;
        log::debug!("Worker finished: {} ({} matches)", source.display(), matches);

        // Release the signal handle before arriving at the barrier
        drop(signal);
        drop(guard);
        matches
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator_core::diagnostics::{CollectingSink, DiagnosticKind};
    use crate::aggregator_core::reader::MemorySourceReader;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct Tally(AtomicUsize);

    #[async_trait]
    impl MatchSignal for Tally {
        async fn signal(&self) {
            self.0.fetch_add(1, Ordering::Relaxed);
        }
    }

    async fn scan(contents: &str) -> (usize, usize, CollectingSink) {
        let reader = MemorySourceReader::new().with_source("s.json", contents);
        let sink = CollectingSink::new();
        let tally = Tally::default();

        let matches = scan_source(&reader, &sink, Path::new("s.json"), &tally).await;
        (matches, tally.0.load(Ordering::Relaxed), sink)
    }

    #[tokio::test]
    async fn test_signals_once_per_tcp_record() {
        let (matches, signalled, sink) = scan(
            r#"{"time":"2024-03-01T12:00:00Z","proto":"TCP"}
{"time":"2024-03-01T12:00:01Z","proto":"UDP"}
{"time":"2024-03-01T12:00:02Z","proto":"TCP"}"#,
        )
        .await;

        assert_eq!(matches, 2);
        assert_eq!(signalled, 2);
        assert!(sink.is_empty());
    }

    #[tokio::test]
    async fn test_concatenated_records() {
        let (matches, _, sink) = scan(r#"{"proto":"TCP"}{"proto":"TCP"} {"proto":"ICMP"}"#).await;

        assert_eq!(matches, 2);
        assert!(sink.is_empty());
    }

    #[tokio::test]
    async fn test_null_fields_do_not_stop_scan() {
        let (matches, signalled, sink) =
            scan(r#"{"proto":"TCP"} {"time":null,"proto":null} {"proto":"TCP"}"#).await;

        assert_eq!(matches, 2);
        assert_eq!(signalled, 2);
        assert!(sink.is_empty());
    }

    #[tokio::test]
    async fn test_empty_source() {
        let (matches, _, sink) = scan("  \n").await;

        assert_eq!(matches, 0);
        assert!(sink.is_empty());
    }

    #[tokio::test]
    async fn test_decode_error_keeps_prefix() {
        let (matches, signalled, sink) =
            scan(r#"{"proto":"TCP"} {"proto":"TCP"} {"proto": oops} {"proto":"TCP"}"#).await;

        assert_eq!(matches, 2);
        assert_eq!(signalled, 2);
        let diagnostics = sink.diagnostics();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].kind, DiagnosticKind::Decode);
    }

    #[tokio::test]
    async fn test_truncated_trailing_record() {
        let (matches, _, sink) = scan(r#"{"proto":"TCP"} {"proto":"TC"#).await;

        assert_eq!(matches, 1);
        assert_eq!(sink.diagnostics()[0].kind, DiagnosticKind::Decode);
    }

    #[tokio::test]
    async fn test_unreadable_source() {
        let reader = MemorySourceReader::new();
        let sink = CollectingSink::new();
        let tally = Tally::default();

        let matches = scan_source(&reader, &sink, Path::new("missing.json"), &tally).await;

        assert_eq!(matches, 0);
        let diagnostics = sink.diagnostics();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].kind, DiagnosticKind::Read);
        assert_eq!(diagnostics[0].source, PathBuf::from("missing.json"));
    }
}
