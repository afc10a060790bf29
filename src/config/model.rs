// src/config/model.rs

use std::collections::BTreeMap;

use serde::Deserialize;

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [settings]
/// log_level = "info"
/// poll_interval = 15
///
/// [scripts]
/// dir = "scripts"
/// direct = ["sync_assets", "prune_cache"]
/// family = ["archive"]
/// runner = "run_family"
///
/// [schedule]
/// sync_assets = "daily(09:00)"
/// prune_cache = "hourly(30)"
///
/// [schedule.archive]
/// archive_media = "weekly(monday@02:30)"
/// archive_books = ""
/// ```
///
/// The whole file is re-read every poll cycle, so edits take effect without a
/// restart. A reload that parses to an identical schedule is a no-op.
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    /// Global behaviour from `[settings]`.
    #[serde(default)]
    pub settings: SettingsSection,

    /// The closed set of launchable scripts from `[scripts]`.
    pub scripts: ScriptsSection,

    /// The schedule from `[schedule]` and `[schedule.<family>]`.
    ///
    /// Keys are script names, or family keys whose value is a nested
    /// instance-name → time-spec table.
    #[serde(default)]
    pub schedule: BTreeMap<String, ScheduleValue>,
}

/// `[settings]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct SettingsSection {
    /// Log level applied on every reload unless pinned by the CLI or the
    /// environment. Unset means `info`.
    #[serde(default)]
    pub log_level: Option<String>,

    /// Seconds slept between poll cycles.
    #[serde(default = "default_poll_interval")]
    pub poll_interval: u64,

    /// Endpoint consulted at most once per calendar day for a newer release.
    /// Unset disables the check.
    #[serde(default)]
    pub version_url: Option<String>,
}

fn default_poll_interval() -> u64 {
    15
}

impl Default for SettingsSection {
    fn default() -> Self {
        Self {
            log_level: None,
            poll_interval: default_poll_interval(),
            version_url: None,
        }
    }
}

/// `[scripts]` section: the closed set of names scriptherd may launch.
///
/// Direct scripts each have a dedicated zero-argument entry point named after
/// the script. Family scripts share the `runner` entry point, which receives
/// the script name as its single argument; a schedule name belongs to a
/// family when it starts with one of the listed family names.
#[derive(Debug, Clone, Deserialize)]
pub struct ScriptsSection {
    /// Directory holding the entry points, relative to the config file.
    #[serde(default = "default_script_dir")]
    pub dir: String,

    /// Scripts with their own entry point.
    #[serde(default)]
    pub direct: Vec<String>,

    /// Family base names dispatched through the shared runner.
    #[serde(default)]
    pub family: Vec<String>,

    /// Shared single-argument entry point for family scripts.
    #[serde(default)]
    pub runner: Option<String>,
}

fn default_script_dir() -> String {
    "scripts".to_string()
}

/// A `[schedule]` value: either a time-spec string, or a nested table of
/// instance-name → time-spec for a family of script instances.
///
/// An empty string disables the entry without removing it from the file.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ScheduleValue {
    /// Flat entry: `name = "daily(09:00)"`.
    Spec(String),

    /// Grouped entries: `[schedule.<family>]` with one line per instance.
    /// The family key exists purely for grouping; each inner key becomes an
    /// independent schedule entry under its own name.
    Group(BTreeMap<String, String>),
}
