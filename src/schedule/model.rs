// src/schedule/model.rs

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::fmt;

use crate::config::model::ScheduleValue;
use crate::registry::ScriptRegistry;
use crate::schedule::timespec::TimeSpec;

/// One flattened schedule line: a script name and its parsed time-spec.
///
/// Entries are rebuilt wholesale on every reload and compared by value
/// against the previous cycle's snapshot; `raw` keeps the verbatim config
/// string so that any textual change re-announces the schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleEntry {
    pub name: String,
    pub raw: String,
    pub spec: SpecStatus,
}

/// Parse outcome of a schedule entry's value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecStatus {
    /// Blank value: the entry is kept for display but never fires.
    Disabled,
    /// Unparseable value: reported once per announcement, never due.
    Invalid,
    /// Parsed time-spec, evaluated every cycle.
    Active(TimeSpec),
}

impl ScheduleEntry {
    pub fn new(name: String, raw: &str) -> Self {
        let trimmed = raw.trim();
        let spec = if trimmed.is_empty() {
            SpecStatus::Disabled
        } else {
            match trimmed.parse::<TimeSpec>() {
                Ok(spec) => SpecStatus::Active(spec),
                Err(_) => SpecStatus::Invalid,
            }
        };
        Self {
            name,
            raw: raw.to_string(),
            spec,
        }
    }

    /// The parsed spec, when this entry can fire at all.
    pub fn time_spec(&self) -> Option<&TimeSpec> {
        match &self.spec {
            SpecStatus::Active(spec) => Some(spec),
            _ => None,
        }
    }
}

/// Flatten the configured mapping into one entry per leaf value.
///
/// Flat values map straight through; grouped values contribute one entry per
/// inner key, named by the inner key; the family key is dropped, since it
/// only groups lines in the file and has no runtime identity. Order follows the
/// map's deterministic iteration order. Nothing is merged or deduplicated
/// here; duplicates are surfaced by [`validate_entries`].
pub fn flatten(schedule: &BTreeMap<String, ScheduleValue>) -> Vec<ScheduleEntry> {
    let mut entries = Vec::new();

    for (name, value) in schedule {
        match value {
            ScheduleValue::Spec(raw) => entries.push(ScheduleEntry::new(name.clone(), raw)),
            ScheduleValue::Group(instances) => {
                for (instance, raw) in instances {
                    entries.push(ScheduleEntry::new(instance.clone(), raw));
                }
            }
        }
    }

    entries
}

/// A schedule-level problem that skips one entry but never stops the loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduleIssue {
    /// A flattened name appeared more than once; the first occurrence wins.
    Duplicate { name: String },
    /// The entry's value did not parse as a time-spec.
    InvalidSpec { name: String, raw: String },
    /// The name matches neither the direct set nor any family prefix.
    UnknownScript { name: String },
}

impl fmt::Display for ScheduleIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScheduleIssue::Duplicate { name } => {
                write!(f, "duplicate schedule entry '{name}'; keeping the first")
            }
            ScheduleIssue::InvalidSpec { name, raw } => {
                write!(f, "schedule entry '{name}' has an invalid time spec '{raw}'")
            }
            ScheduleIssue::UnknownScript { name } => {
                write!(f, "Script: {name} does not exist")
            }
        }
    }
}

/// Validation pass over flattened entries.
///
/// Returns the dispatch-eligible subset (unique name, active spec, resolvable
/// through the registry) plus the issues found. Disabled entries are skipped
/// silently: a blank value is how entries are turned off on purpose.
pub fn validate_entries<'a>(
    entries: &'a [ScheduleEntry],
    registry: &ScriptRegistry,
) -> (Vec<&'a ScheduleEntry>, Vec<ScheduleIssue>) {
    let mut seen = BTreeSet::new();
    let mut eligible = Vec::new();
    let mut issues = Vec::new();

    for entry in entries {
        if !seen.insert(entry.name.as_str()) {
            issues.push(ScheduleIssue::Duplicate {
                name: entry.name.clone(),
            });
            continue;
        }

        match &entry.spec {
            SpecStatus::Disabled => continue,
            SpecStatus::Invalid => {
                issues.push(ScheduleIssue::InvalidSpec {
                    name: entry.name.clone(),
                    raw: entry.raw.clone(),
                });
                continue;
            }
            SpecStatus::Active(_) => {}
        }

        if registry.resolve(&entry.name).is_err() {
            issues.push(ScheduleIssue::UnknownScript {
                name: entry.name.clone(),
            });
            continue;
        }

        eligible.push(entry);
    }

    (eligible, issues)
}
