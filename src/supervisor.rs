// src/supervisor.rs

//! The polling supervisor loop.
//!
//! One cycle, in order:
//! 1. reload the config file (hot reload; the previous good state is kept on
//!    failure)
//! 2. run the once-a-day release check
//! 3. announce the schedule when it changed since the last cycle
//! 4. evaluate due entries and dispatch them, one process per script name
//! 5. reap finished processes and free their name slots
//! 6. show the idle message once per idle streak
//!
//! then sleep a fixed interval, racing an interrupt. The loop is
//! single-threaded; concurrency exists only in the launched processes, so
//! the tracker needs no locking. Nothing in a cycle blocks on a script: a
//! hung script occupies its own name's slot indefinitely and nothing else.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Result, anyhow};
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};
use tracing::level_filters::LevelFilter;

use crate::config::{self, model::ConfigFile};
use crate::exec::{Dispatcher, scripts_root};
use crate::logging::{self, LevelHandle};
use crate::registry::ScriptRegistry;
use crate::report;
use crate::schedule::{ScheduleEntry, firing_window, flatten, validate_entries};
use crate::tracker::RunTracker;
use crate::version::UpdateChecker;

/// What one poll cycle did; used for logging decisions and by tests.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CycleReport {
    pub announced: bool,
    pub dispatched: Vec<String>,
    pub reaped: Vec<String>,
}

/// The orchestrating state machine. Owns the run tracker and all per-cycle
/// bookkeeping; constructed fresh per process (and per test).
pub struct Supervisor {
    config_path: PathBuf,
    registry: ScriptRegistry,
    dispatcher: Dispatcher,
    tracker: RunTracker,
    poll_interval: Duration,

    entries: Vec<ScheduleEntry>,
    snapshot: Option<Vec<ScheduleEntry>>,

    /// Names that already fired in the current window; pruned every cycle.
    fired: HashMap<String, NaiveDateTime>,

    version_url: Option<String>,
    last_version_check: Option<NaiveDate>,

    level: Option<LevelHandle>,
    applied_level: Option<LevelFilter>,

    waiting_shown: bool,
    reload_error_shown: bool,
    registry_error_shown: bool,
}

impl Supervisor {
    pub fn new(
        config_path: PathBuf,
        cfg: &ConfigFile,
        registry: ScriptRegistry,
        level: Option<LevelHandle>,
    ) -> Self {
        let dispatcher = Dispatcher::new(scripts_root(&config_path, &cfg.scripts.dir));
        Self {
            dispatcher,
            config_path,
            registry,
            tracker: RunTracker::new(),
            poll_interval: Duration::from_secs(cfg.settings.poll_interval.max(1)),
            entries: flatten(&cfg.schedule),
            snapshot: None,
            fired: HashMap::new(),
            version_url: cfg.settings.version_url.clone(),
            last_version_check: None,
            level,
            applied_level: None,
            waiting_shown: false,
            reload_error_shown: false,
            registry_error_shown: false,
        }
    }

    /// Run the polling loop until interrupted or a bookkeeping failure.
    pub async fn run(mut self) -> Result<()> {
        let mut interrupt = spawn_interrupt_listener();

        info!("{}", report::section_bar("START"));

        let outcome = self.run_loop(&mut interrupt).await;
        match &outcome {
            Ok(()) => info!("Interrupt received. Exiting..."),
            Err(err) => error!("\nAn unexpected error occurred:\n\n{err:?}\n"),
        }

        self.finish();

        // The full context was already logged above; hand main a one-liner.
        outcome.map_err(|_| anyhow!("supervisor stopped after an unexpected error"))
    }

    async fn run_loop(&mut self, interrupt: &mut mpsc::Receiver<()>) -> Result<()> {
        loop {
            self.cycle(Local::now()).await?;

            tokio::select! {
                _ = tokio::time::sleep(self.poll_interval) => {}
                _ = interrupt.recv() => return Ok(()),
            }
        }
    }

    fn finish(&self) {
        let still_running = self.tracker.running_names();
        if !still_running.is_empty() {
            info!(
                scripts = ?still_running,
                "Leaving started scripts to run to completion"
            );
        }
        info!("{}", report::section_bar("END"));
    }

    /// One poll cycle against the given wall-clock instant.
    ///
    /// Public so tests can drive the loop with a fixed `now`.
    pub async fn cycle(&mut self, now: DateTime<Local>) -> Result<CycleReport> {
        let mut report = CycleReport::default();

        self.reload_config();
        self.maybe_check_version(now).await;
        self.announce_if_changed(&mut report);
        self.evaluate_due(now, &mut report);
        self.reap_finished(&mut report);

        if !self.waiting_shown {
            info!("Waiting for scheduled scripts...");
            self.waiting_shown = true;
        }

        Ok(report)
    }

    /// Re-read the config file; on failure keep the previous good state and
    /// log once per error streak.
    fn reload_config(&mut self) {
        match config::load_from_path(&self.config_path) {
            Ok(cfg) => {
                self.reload_error_shown = false;
                self.apply_config(&cfg);
            }
            Err(err) => {
                if !self.reload_error_shown {
                    error!(
                        path = %self.config_path.display(),
                        error = ?err,
                        "failed to reload configuration; keeping the previous schedule"
                    );
                    self.reload_error_shown = true;
                }
            }
        }
    }

    fn apply_config(&mut self, cfg: &ConfigFile) {
        self.apply_log_level(cfg);

        self.poll_interval = Duration::from_secs(cfg.settings.poll_interval.max(1));
        self.version_url = cfg.settings.version_url.clone();

        match ScriptRegistry::from_config(&cfg.scripts) {
            Ok(registry) => {
                self.registry = registry;
                self.dispatcher =
                    Dispatcher::new(scripts_root(&self.config_path, &cfg.scripts.dir));
                self.registry_error_shown = false;
            }
            Err(err) => {
                if !self.registry_error_shown {
                    error!(
                        error = %err,
                        "invalid [scripts] section in reloaded configuration; keeping the previous registry"
                    );
                    self.registry_error_shown = true;
                }
            }
        }

        self.entries = flatten(&cfg.schedule);
    }

    fn apply_log_level(&mut self, cfg: &ConfigFile) {
        let Some(handle) = &self.level else { return };

        let target = cfg
            .settings
            .log_level
            .as_deref()
            .and_then(logging::parse_level_filter)
            .unwrap_or(LevelFilter::INFO);

        if self.applied_level == Some(target) {
            return;
        }

        match handle.reload(target) {
            Ok(()) => {
                // The very first application is startup, not a change.
                if self.applied_level.is_some() {
                    info!(level = %target, "log level updated from configuration");
                }
                self.applied_level = Some(target);
            }
            Err(err) => debug!(error = %err, "could not update log level"),
        }
    }

    /// Consult the release endpoint at most once per calendar day.
    async fn maybe_check_version(&mut self, now: DateTime<Local>) {
        let Some(url) = self.version_url.clone() else {
            return;
        };

        let today = now.date_naive();
        if self.last_version_check.is_some_and(|last| last >= today) {
            return;
        }

        debug!("Checking for new version...");
        match UpdateChecker::new(url) {
            Ok(checker) => {
                if let Err(err) = checker.check().await {
                    error!(error = ?err, "version check failed");
                }
            }
            Err(err) => error!(error = ?err, "version check failed"),
        }

        self.last_version_check = Some(today);
        let next_check = (now + chrono::Duration::days(1)).format("%A %I:%M %p");
        info!("Next version check: {next_check}");
    }

    /// Emit the schedule rendering when the flattened schedule differs from
    /// the retained snapshot (or on the very first cycle). Schedule-level
    /// issues are reported here, once per change, never per idle cycle.
    fn announce_if_changed(&mut self, out: &mut CycleReport) {
        if self.snapshot.as_ref() == Some(&self.entries) {
            return;
        }

        let (_eligible, issues) = validate_entries(&self.entries, &self.registry);

        info!("{}", report::section_bar("SCHEDULE"));
        info!("\n{}", report::schedule_table(&self.entries));
        info!("{}", report::section_bar("SCHEDULE"));
        for issue in &issues {
            error!("{issue}");
        }

        self.snapshot = Some(self.entries.clone());
        self.waiting_shown = false;
        out.announced = true;
    }

    /// Dispatch every eligible entry whose spec matches `now`, skipping names
    /// that are still running or that already fired in this window. A failure
    /// for one entry never stops evaluation of the rest.
    fn evaluate_due(&mut self, now: DateTime<Local>, out: &mut CycleReport) {
        let window = firing_window(now.naive_local());
        let (eligible, _issues) = validate_entries(&self.entries, &self.registry);

        for entry in eligible {
            if self.tracker.is_running(&entry.name) {
                continue;
            }
            if self.fired.get(&entry.name) == Some(&window) {
                continue;
            }
            let Some(spec) = entry.time_spec() else { continue };
            if !spec.is_due(now.naive_local()) {
                continue;
            }

            let kind = match self.registry.resolve(&entry.name) {
                Ok(kind) => kind,
                // Unresolvable entries were already filtered and reported.
                Err(_) => continue,
            };

            match self.dispatcher.start(&kind) {
                Ok(handle) => {
                    info!(script = %entry.name, pid = ?handle.pid(), "Script started");
                    self.tracker.record(handle);
                    self.fired.insert(entry.name.clone(), window);
                    self.waiting_shown = false;
                    out.dispatched.push(entry.name.clone());
                }
                Err(err) => {
                    error!(script = %entry.name, error = %err, "failed to start script");
                }
            }
        }

        self.fired.retain(|_, w| *w == window);
    }

    fn reap_finished(&mut self, out: &mut CycleReport) {
        for (name, status) in self.tracker.reap() {
            if status.success() {
                info!("Script: {name} has finished");
            } else {
                warn!(status = %status, "Script: {name} has finished");
            }
            self.waiting_shown = false;
            out.reaped.push(name);
        }
    }

    /// Read access for tests and shutdown reporting.
    pub fn tracker(&self) -> &RunTracker {
        &self.tracker
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }
}

/// Ctrl-C → one message on the returned channel.
fn spawn_interrupt_listener() -> mpsc::Receiver<()> {
    let (tx, rx) = mpsc::channel(1);

    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                let _ = tx.send(()).await;
            }
            Err(err) => {
                eprintln!("failed to listen for Ctrl+C: {err}");
                // Keep the sender alive: a closed channel would read as an
                // interrupt and stop the loop.
                std::future::pending::<()>().await;
            }
        }
    });

    rx
}
