//! Aggregator Core - Concurrent TCP Traffic Counting
//!
//! Counts TCP records across independently readable sources. Every source is
//! scanned by its own tokio task, and the per-worker matches are combined by
//! one of three interchangeable strategies.
//!
//! # Architecture
//!
//! ```text
//! sources → spawn_worker (one task per source)
//!     ↓ SourceReader::read → serde_json stream decode → Traffic::is_tcp
//!     ↓ MatchSignal::signal (strategy specific)
//! atomic:  AtomicU64::fetch_add      ┐
//! channel: mpsc send → recv loop      ├→ CompletionBarrier → total
//! mutex:   GuardedCounter::increment  ┘
//!     ↓
//! read/decode errors → DiagnosticSink (LogSink | CollectingSink)
//! ```

pub mod atomic;
pub mod barrier;
pub mod channel;
pub mod counter;
pub mod diagnostics;
pub mod errors;
pub mod mutex;
pub mod reader;
pub mod worker;

pub use barrier::{CompletionBarrier, CompletionGuard};
pub use channel::{DEFAULT_CHANNEL_CAPACITY, MIN_CHANNEL_CAPACITY};
pub use counter::{RunReport, Strategy, TrafficCounter, UnknownStrategy};
pub use diagnostics::{CollectingSink, Diagnostic, DiagnosticKind, DiagnosticSink, LogSink};
pub use errors::ScanError;
pub use mutex::GuardedCounter;
pub use reader::{FsSourceReader, MemorySourceReader, SourceReader};
pub use worker::{scan_source, spawn_worker, MatchSignal, ScanContext};
