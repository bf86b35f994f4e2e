//! Concurrent TCP traffic counting over JSON record files
//!
//! Each source file is scanned by its own worker task and the per-worker
//! matches are combined with one of three aggregation strategies (atomic,
//! channel, mutex) that always agree on the total.

pub mod aggregator_core;
pub mod config;
pub mod traffic;

pub use aggregator_core::{RunReport, Strategy, TrafficCounter};
pub use traffic::{Traffic, TCP_PROTOCOL};
