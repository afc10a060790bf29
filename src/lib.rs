// src/lib.rs

pub mod cli;
pub mod config;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod registry;
pub mod report;
pub mod schedule;
pub mod supervisor;
pub mod tracker;
pub mod version;

use std::path::PathBuf;

use anyhow::Result;
use tracing::{error, info};

use crate::cli::CliArgs;
use crate::config::loader::load_and_validate;
use crate::config::model::ConfigFile;
use crate::exec::{Dispatcher, scripts_root};
use crate::logging::LevelHandle;
use crate::registry::ScriptRegistry;
use crate::schedule::{flatten, validate_entries};
use crate::supervisor::Supervisor;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading + startup validation
/// - the script registry and dispatcher
/// - one of three modes: dry-run, one-shot dispatch of named scripts, or the
///   persistent polling supervisor
pub async fn run(args: CliArgs, level: Option<LevelHandle>) -> Result<()> {
    let config_path = PathBuf::from(&args.config);
    let cfg = load_and_validate(&config_path)?;
    let registry = ScriptRegistry::from_config(&cfg.scripts)?;

    if args.dry_run {
        print_dry_run(&cfg, &registry);
        return Ok(());
    }

    if !args.scripts.is_empty() {
        let dispatcher = Dispatcher::new(scripts_root(&config_path, &cfg.scripts.dir));
        run_once(&registry, &dispatcher, &args.scripts);
        return Ok(());
    }

    Supervisor::new(config_path, &cfg, registry, level)
        .run()
        .await
}

/// Outcome of a one-shot invocation, per requested name.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct OneShotReport {
    pub dispatched: Vec<String>,
    pub unknown: Vec<String>,
    pub failed: Vec<String>,
}

/// Dispatch each named script exactly once, bypassing the schedule.
///
/// Fire-and-forget: the handles are dropped and the detached processes run to
/// completion on their own, so the caller may exit immediately. An unknown
/// name is reported without aborting the others.
pub fn run_once(
    registry: &ScriptRegistry,
    dispatcher: &Dispatcher,
    names: &[String],
) -> OneShotReport {
    let mut report = OneShotReport::default();

    for name in names {
        match registry.resolve(name) {
            Err(err) => {
                error!("{err}");
                report.unknown.push(name.clone());
            }
            Ok(kind) => match dispatcher.start(&kind) {
                Ok(handle) => {
                    info!(script = %name, pid = ?handle.pid(), "Script started");
                    report.dispatched.push(name.clone());
                }
                Err(err) => {
                    error!(script = %name, error = %err, "failed to start script");
                    report.failed.push(name.clone());
                }
            },
        }
    }

    report
}

/// Simple dry-run output: print settings, the registry, and the flattened
/// schedule, then exit without executing anything.
fn print_dry_run(cfg: &ConfigFile, registry: &ScriptRegistry) {
    println!("scriptherd dry-run");
    println!("  settings.poll_interval = {}s", cfg.settings.poll_interval);
    if let Some(url) = &cfg.settings.version_url {
        println!("  settings.version_url = {url}");
    }
    println!("  scripts.dir = {}", cfg.scripts.dir);
    println!();

    let direct: Vec<&str> = registry.direct_names().collect();
    println!("direct scripts ({}):", direct.len());
    for name in direct {
        println!("  - {name}");
    }
    if !registry.family_bases().is_empty() {
        println!("family scripts ({}):", registry.family_bases().len());
        for base in registry.family_bases() {
            println!("  - {base}*");
        }
    }
    println!();

    let entries = flatten(&cfg.schedule);
    println!("{}", report::schedule_table(&entries));

    let (_eligible, issues) = validate_entries(&entries, registry);
    for issue in &issues {
        println!("  warning: {issue}");
    }
}
