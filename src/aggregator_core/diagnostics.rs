//! Diagnostic sinks for non-fatal scan errors
//!
//! Workers never propagate read/decode failures; they hand them to an injected
//! [`DiagnosticSink`] and keep going. [`LogSink`] forwards to the `log` facade,
//! [`CollectingSink`] keeps them in memory so callers can inspect what failed.

use super::errors::ScanError;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    Read,
    Decode,
}

/// A recorded scan failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub source: PathBuf,
    pub kind: DiagnosticKind,
    pub message: String,
}

impl Diagnostic {
    pub fn new(source: &Path, error: &ScanError) -> Self {
        let kind = match error {
            ScanError::Read(_) => DiagnosticKind::Read,
            ScanError::Decode(_) => DiagnosticKind::Decode,
        };
        Self {
            source: source.to_path_buf(),
            kind,
            message: error.to_string(),
        }
    }
}

/// Side channel receiving every error a worker hits
pub trait DiagnosticSink: Send + Sync {
    fn report(&self, source: &Path, error: &ScanError);
}

/// Process-wide sink backed by the `log` facade
#[derive(Debug, Clone, Default)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn report(&self, source: &Path, error: &ScanError) {
        log::warn!("⚠️  {}: {}", source.display(), error);
    }
}

/// Sink that records diagnostics for later inspection
#[derive(Debug, Default)]
pub struct CollectingSink {
    diagnostics: Mutex<Vec<Diagnostic>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything reported so far
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn len(&self) -> usize {
        self.diagnostics
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DiagnosticSink for CollectingSink {
    fn report(&self, source: &Path, error: &ScanError) {
        self.diagnostics
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(Diagnostic::new(source, error));
    }
}

/// Forwards to an inner sink while counting reports for one run
pub(crate) struct CountingSink {
    inner: Arc<dyn DiagnosticSink>,
    reported: AtomicUsize,
}

impl CountingSink {
    pub(crate) fn new(inner: Arc<dyn DiagnosticSink>) -> Self {
        Self {
            inner,
            reported: AtomicUsize::new(0),
        }
    }

    pub(crate) fn reported(&self) -> usize {
        self.reported.load(Ordering::Relaxed)
    }
}

impl DiagnosticSink for CountingSink {
    fn report(&self, source: &Path, error: &ScanError) {
        self.reported.fetch_add(1, Ordering::Relaxed);
        self.inner.report(source, error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_error() -> ScanError {
        ScanError::Read(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"))
    }

    #[test]
    fn test_collecting_sink_records_kind() {
        let sink = CollectingSink::new();
        let decode = serde_json::from_str::<serde_json::Value>("{").unwrap_err();

        sink.report(Path::new("a.json"), &read_error());
        sink.report(Path::new("b.json"), &ScanError::Decode(decode));

        let diagnostics = sink.diagnostics();
        assert_eq!(diagnostics.len(), 2);
        assert_eq!(diagnostics[0].source, PathBuf::from("a.json"));
        assert_eq!(diagnostics[0].kind, DiagnosticKind::Read);
        assert!(diagnostics[0].message.contains("gone"));
        assert_eq!(diagnostics[1].kind, DiagnosticKind::Decode);
    }

    #[test]
    fn test_counting_sink_forwards() {
        let collected = Arc::new(CollectingSink::new());
        let counting = CountingSink::new(collected.clone());

        counting.report(Path::new("a.json"), &read_error());
        counting.report(Path::new("a.json"), &read_error());

        assert_eq!(counting.reported(), 2);
        assert_eq!(collected.len(), 2);
    }
}
