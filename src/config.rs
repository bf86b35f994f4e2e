//! Runtime configuration from environment variables and command-line arguments

use crate::aggregator_core::{Strategy, DEFAULT_CHANNEL_CAPACITY, MIN_CHANNEL_CAPACITY};
use std::env;
use std::path::PathBuf;

/// Which strategies a run executes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategySelection {
    All,
    Only(Strategy),
}

impl StrategySelection {
    pub fn strategies(&self) -> Vec<Strategy> {
        match self {
            StrategySelection::All => Strategy::all().to_vec(),
            StrategySelection::Only(strategy) => vec![*strategy],
        }
    }

    fn parse(value: &str) -> Result<Self, ConfigError> {
        if value.trim().eq_ignore_ascii_case("all") {
            return Ok(StrategySelection::All);
        }
        value
            .parse::<Strategy>()
            .map(StrategySelection::Only)
            .map_err(|e| ConfigError::InvalidValue(e.to_string()))
    }
}

#[derive(Debug)]
pub enum ConfigError {
    MissingValue(String),
    InvalidValue(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::MissingValue(flag) => write!(f, "Missing value for {}", flag),
            ConfigError::InvalidValue(msg) => write!(f, "Invalid configuration value: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Configuration for a counting run
///
/// Environment variables:
/// - `SIGNAL_CHANNEL_CAPACITY` - channel strategy buffer (default: 1, minimum: 1)
/// - `TRAFFIC_STRATEGY` - `atomic`, `channel`, `mutex` or `all` (default: all)
#[derive(Debug, Clone)]
pub struct TrafficConfig {
    pub channel_capacity: usize,
    pub strategy: StrategySelection,
}

impl Default for TrafficConfig {
    fn default() -> Self {
        Self {
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
            strategy: StrategySelection::All,
        }
    }
}

impl TrafficConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; invalid values fall back to defaults with a warning
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let channel_capacity = match lookup("SIGNAL_CHANNEL_CAPACITY") {
            Some(raw) => match raw.trim().parse::<usize>() {
                Ok(capacity) if capacity < MIN_CHANNEL_CAPACITY => {
                    log::warn!(
                        "SIGNAL_CHANNEL_CAPACITY={} is below the minimum, using {}",
                        capacity,
                        MIN_CHANNEL_CAPACITY
                    );
                    MIN_CHANNEL_CAPACITY
                }
                Ok(capacity) => capacity,
                Err(_) => {
                    log::warn!(
                        "Invalid SIGNAL_CHANNEL_CAPACITY '{}', defaulting to {}",
                        raw,
                        defaults.channel_capacity
                    );
                    defaults.channel_capacity
                }
            },
            None => defaults.channel_capacity,
        };

        let strategy = match lookup("TRAFFIC_STRATEGY") {
            Some(raw) => StrategySelection::parse(&raw).unwrap_or_else(|e| {
                log::warn!("{}, running all strategies", e);
                StrategySelection::All
            }),
            None => defaults.strategy,
        };

        Self {
            channel_capacity,
            strategy,
        }
    }
}

/// Parsed command line: `[--strategy NAME] [--] <path>...`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliArgs {
    pub strategy: Option<StrategySelection>,
    pub sources: Vec<PathBuf>,
}

impl CliArgs {
    /// Parse arguments (without the program name)
    pub fn parse<I>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = String>,
    {
        let mut parsed = CliArgs::default();
        let mut args = args.into_iter();
        let mut options_done = false;

        while let Some(arg) = args.next() {
            if options_done {
                parsed.sources.push(PathBuf::from(arg));
                continue;
            }
            match arg.as_str() {
                "--" => options_done = true,
                "--strategy" => {
                    let value = args
                        .next()
                        .ok_or_else(|| ConfigError::MissingValue("--strategy".to_string()))?;
                    parsed.strategy = Some(StrategySelection::parse(&value)?);
                }
                // A lone "-" is a path; use "--" to pass paths that start with a dash
                flag if flag.starts_with('-') && flag.len() > 1 => {
                    return Err(ConfigError::InvalidValue(format!(
                        "unknown option '{}'",
                        flag
                    )));
                }
                _ => parsed.sources.push(PathBuf::from(arg)),
            }
        }

        Ok(parsed)
    }
}
