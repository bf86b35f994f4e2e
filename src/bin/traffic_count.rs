//! Traffic Count Binary - TCP record totals across JSON traffic files
//!
//! Runs the atomic, channel and mutex aggregation strategies against the same
//! files and prints one `<strategy> <count>` line per strategy.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --release --bin traffic_count -- [--strategy atomic|channel|mutex|all] <file>...
//! ```
//!
//! ## Environment Variables
//!
//! - SIGNAL_CHANNEL_CAPACITY - Buffer size of the channel strategy (default: 1, minimum: 1)
//! - TRAFFIC_STRATEGY - Strategy to run when --strategy is absent (default: all)
//! - RUST_LOG - Logging level (optional, default: info)

use std::sync::Arc;
use trafficcount::aggregator_core::{FsSourceReader, LogSink};
use trafficcount::config::{CliArgs, TrafficConfig};
use trafficcount::TrafficCounter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    let config = TrafficConfig::from_env();

    let args = CliArgs::parse(std::env::args().skip(1)).unwrap_or_else(|e| {
        log::error!("{}", e);
        log::warn!("Ignoring arguments, counting no sources");
        CliArgs::default()
    });
    let selection = args.strategy.unwrap_or(config.strategy);

    log::info!("🚀 Starting traffic count");
    log::info!("   Sources: {}", args.sources.len());
    log::info!("   Signal channel capacity: {}", config.channel_capacity);

    if args.sources.is_empty() {
        log::warn!("No sources given, every strategy will report 0");
    }

    let counter = TrafficCounter::new(Arc::new(FsSourceReader::new()), Arc::new(LogSink))
        .with_channel_capacity(config.channel_capacity);

    for strategy in selection.strategies() {
        let report = counter.run(strategy, &args.sources).await;
        println!("{} {}", report.strategy.label(), report.total);
    }

    Ok(())
}
