// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

/// Command-line arguments for `scriptherd`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "scriptherd",
    version,
    about = "Run named scripts on a declarative, hot-reloadable schedule.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// Default: `Scriptherd.toml` in the current working directory.
    #[arg(long, value_name = "PATH", default_value = "Scriptherd.toml")]
    pub config: String,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `SCRIPTHERD_LOG` or the configured level is used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Parse + validate, print the flattened schedule, but don't execute
    /// anything and don't enter the polling loop.
    #[arg(long)]
    pub dry_run: bool,

    /// Script names to run once, immediately, bypassing the schedule.
    ///
    /// With no names given, scriptherd enters the persistent polling loop.
    #[arg(value_name = "SCRIPT")]
    pub scripts: Vec<String>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
