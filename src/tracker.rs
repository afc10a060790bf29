// src/tracker.rs

//! Tracking of currently-running script processes.
//!
//! The tracker is the one piece of mutable state the loop carries across
//! cycles. It is owned by the supervisor and threaded through explicitly, so
//! tests can build a fresh one per case; no locking is involved because the
//! loop is the only writer.

use std::collections::HashMap;
use std::process::ExitStatus;

use tokio::process::Child;
use tracing::warn;

/// Handle to a single running script process.
///
/// Owned by the [`RunTracker`] from dispatch until reaping. The child is
/// detached (no kill-on-drop), so dropping a handle never terminates the
/// underlying process.
#[derive(Debug)]
pub struct RunHandle {
    name: String,
    child: Child,
}

impl RunHandle {
    pub fn new(name: String, child: Child) -> Self {
        Self { name, child }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// OS pid, while the process is still attached.
    pub fn pid(&self) -> Option<u32> {
        self.child.id()
    }
}

/// Maps running script names to their process handles, enforcing at most one
/// live process per name.
#[derive(Debug, Default)]
pub struct RunTracker {
    running: HashMap<String, RunHandle>,
}

impl RunTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `name` currently holds a live (unreaped) process.
    pub fn is_running(&self, name: &str) -> bool {
        self.running.contains_key(name)
    }

    pub fn running_count(&self) -> usize {
        self.running.len()
    }

    /// Names with a live process, sorted.
    pub fn running_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.running.keys().cloned().collect();
        names.sort();
        names
    }

    /// Insert a freshly-dispatched handle, reserving its name.
    ///
    /// Precondition: `!is_running(handle.name())`. The supervisor checks
    /// before dispatching, so a violation here is a bug in the loop itself,
    /// not a user-facing condition.
    pub fn record(&mut self, handle: RunHandle) {
        debug_assert!(
            !self.running.contains_key(handle.name()),
            "script '{}' recorded while already running",
            handle.name()
        );
        self.running.insert(handle.name().to_string(), handle);
    }

    /// Remove every tracked script whose process has exited and return them,
    /// sorted by name. Non-blocking: uses `try_wait`, never `wait`.
    pub fn reap(&mut self) -> Vec<(String, ExitStatus)> {
        let mut finished = Vec::new();

        self.running.retain(|name, handle| match handle.child.try_wait() {
            Ok(Some(status)) => {
                finished.push((name.clone(), status));
                false
            }
            Ok(None) => true,
            Err(err) => {
                warn!(
                    script = %name,
                    error = %err,
                    "failed to poll script process; dropping its handle"
                );
                false
            }
        });

        finished.sort_by(|a, b| a.0.cmp(&b.0));
        finished
    }
}
