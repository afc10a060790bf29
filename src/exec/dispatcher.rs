// src/exec/dispatcher.rs

use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::process::Command;
use tracing::debug;

use crate::errors::DispatchError;
use crate::registry::DispatchKind;
use crate::tracker::RunHandle;

/// Resolve the scripts directory relative to the config file's location.
pub fn scripts_root(config_path: &Path, dir: &str) -> PathBuf {
    let dir = PathBuf::from(dir);
    if dir.is_absolute() {
        dir
    } else {
        config_path
            .parent()
            .map(|p| p.join(&dir))
            .unwrap_or(dir)
    }
}

/// Starts scripts as detached OS processes from a fixed entry-point
/// directory.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    script_dir: PathBuf,
}

impl Dispatcher {
    pub fn new(script_dir: impl Into<PathBuf>) -> Self {
        Self {
            script_dir: script_dir.into(),
        }
    }

    pub fn script_dir(&self) -> &Path {
        &self.script_dir
    }

    /// Start the resolved script and return its handle.
    ///
    /// Returns as soon as the process has been spawned; it does not wait for
    /// completion. The child inherits stdout/stderr (so supervisor exit can
    /// never break a surviving child's pipes) and is not killed on drop.
    ///
    /// A missing entry point or a failed spawn yields a [`DispatchError`];
    /// the caller logs it and the script is simply retried on its next
    /// natural firing window.
    pub fn start(&self, kind: &DispatchKind) -> Result<RunHandle, DispatchError> {
        let script = kind.script();
        let (entry, arg) = match kind {
            DispatchKind::Direct { script } => (self.script_dir.join(script), None),
            DispatchKind::Family { runner, script } => {
                (self.script_dir.join(runner), Some(script.as_str()))
            }
        };

        if !entry.is_file() {
            return Err(DispatchError::MissingEntryPoint {
                script: script.to_string(),
                path: entry,
            });
        }

        let mut cmd = Command::new(&entry);
        if let Some(arg) = arg {
            cmd.arg(arg);
        }
        cmd.stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        let child = cmd.spawn().map_err(|source| DispatchError::Spawn {
            script: script.to_string(),
            source,
        })?;

        debug!(
            script = %script,
            entry = %entry.display(),
            pid = ?child.id(),
            "spawned script process"
        );

        Ok(RunHandle::new(script.to_string(), child))
    }
}
