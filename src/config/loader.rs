// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::config::model::ConfigFile;
use crate::config::validate::validate_config;

/// Load a configuration file from a given path and return the raw `ConfigFile`.
///
/// This only performs TOML deserialization; it does **not** perform semantic
/// validation (registry name spaces, etc.). Use [`load_and_validate`] for
/// that. The supervisor calls this directly on every poll cycle and keeps the
/// previous good state when it fails.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let path = path.as_ref();
    let contents =
        fs::read_to_string(path).with_context(|| format!("reading config file at {:?}", path))?;

    let config: ConfigFile = toml::from_str(&contents)
        .with_context(|| format!("parsing TOML config from {:?}", path))?;

    Ok(config)
}

/// Load a configuration file from path and run startup validation.
///
/// This is the entry point used before the loop starts:
///
/// - Reads TOML.
/// - Applies defaults (handled by `serde` + `Default` impls).
/// - Checks that the `[scripts]` name spaces are disjoint and the global
///   settings are sane.
///
/// Schedule-level problems (duplicate names, bad time-specs, names outside
/// the registry) are deliberately *not* fatal here: they are surfaced per
/// entry by the supervisor so the rest of the schedule keeps running.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let config = load_from_path(&path)?;
    validate_config(&config)?;
    Ok(config)
}

/// Helper to resolve a default config path.
///
/// Currently this just returns `Scriptherd.toml` in the current working
/// directory.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("Scriptherd.toml")
}
