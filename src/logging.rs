// src/logging.rs

//! Logging setup for `scriptherd` using `tracing` + `tracing-subscriber`.
//!
//! Priority for determining the log level:
//! 1. `--log-level` CLI flag (if provided)
//! 2. `SCRIPTHERD_LOG` environment variable (e.g. "info", "debug")
//! 3. `log_level` from the configuration file, re-applied on every reload
//! 4. default to `info`
//!
//! Logs are sent to STDERR so that script stdout stays untouched.

use anyhow::Result;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{Registry, fmt, reload};

use crate::cli::LogLevel;

/// Handle used by the supervisor to follow `log_level` config changes.
pub type LevelHandle = reload::Handle<LevelFilter, Registry>;

/// Initialise the global logging subscriber.
///
/// Safe to call once at startup. Returns `Some(handle)` when the level is
/// free to follow the configuration file; `None` when a CLI flag or the
/// environment variable pins it for the lifetime of the process.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<Option<LevelHandle>> {
    let env_level = std::env::var("SCRIPTHERD_LOG")
        .ok()
        .and_then(|s| parse_level_filter(&s));

    let pinned = cli_level.is_some() || env_level.is_some();
    let initial = cli_level
        .map(filter_from_cli)
        .or(env_level)
        .unwrap_or(LevelFilter::INFO);

    let (filter, handle) = reload::Layer::new(initial);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_thread_ids(false)
                .with_thread_names(false)
                .with_writer(std::io::stderr),
        )
        .init();

    Ok(if pinned { None } else { Some(handle) })
}

fn filter_from_cli(lvl: LogLevel) -> LevelFilter {
    match lvl {
        LogLevel::Error => LevelFilter::ERROR,
        LogLevel::Warn => LevelFilter::WARN,
        LogLevel::Info => LevelFilter::INFO,
        LogLevel::Debug => LevelFilter::DEBUG,
        LogLevel::Trace => LevelFilter::TRACE,
    }
}

/// Parse a level name as written in the config file or the environment.
pub fn parse_level_filter(s: &str) -> Option<LevelFilter> {
    match s.trim().to_lowercase().as_str() {
        "error" => Some(LevelFilter::ERROR),
        "warn" | "warning" => Some(LevelFilter::WARN),
        "info" => Some(LevelFilter::INFO),
        "debug" => Some(LevelFilter::DEBUG),
        "trace" => Some(LevelFilter::TRACE),
        _ => None,
    }
}
