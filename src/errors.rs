// src/errors.rs

//! Crate-wide typed errors.
//!
//! `anyhow` is used at the application boundary (config loading, the
//! supervisor loop); the enums here cover the places where callers branch on
//! the failure: name resolution, process dispatch, and time-spec parsing.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from building or querying the script registry.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum RegistryError {
    #[error("[scripts] must list at least one direct or family script")]
    EmptyRegistry,

    #[error("duplicate script name '{0}' in [scripts]")]
    DuplicateName(String),

    #[error("[scripts].runner is required when family scripts are configured")]
    MissingRunner,

    #[error("direct script '{name}' also matches family prefix '{family}'")]
    AmbiguousName { name: String, family: String },

    #[error("family '{shorter}' is a prefix of family '{longer}'")]
    OverlappingFamilies { shorter: String, longer: String },

    #[error("Script: {0} does not exist")]
    UnknownScript(String),
}

/// Errors from starting a script process.
#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("entry point for script '{script}' not found at {path:?}")]
    MissingEntryPoint { script: String, path: PathBuf },

    #[error("failed to spawn process for script '{script}'")]
    Spawn {
        script: String,
        #[source]
        source: std::io::Error,
    },
}

/// Errors from parsing a schedule time-spec string.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimeSpecError {
    #[error("empty time spec")]
    Empty,

    #[error("unknown time spec kind '{0}'")]
    UnknownKind(String),

    #[error("invalid clock time '{0}' (expected HH:MM)")]
    BadClockTime(String),

    #[error("invalid minute '{0}' (expected 0-59)")]
    BadMinute(String),

    #[error("invalid weekday '{0}'")]
    BadWeekday(String),

    #[error("invalid day of month '{0}' (expected 1-31)")]
    BadDayOfMonth(String),

    #[error("malformed time spec '{0}'")]
    Malformed(String),
}
