// src/config/validate.rs

use anyhow::{Context, Result, anyhow};

use crate::config::model::ConfigFile;
use crate::registry::ScriptRegistry;

/// Run startup validation against a loaded configuration.
///
/// This checks:
/// - `poll_interval >= 1`
/// - the `[scripts]` section builds a valid registry: at least one script,
///   no duplicate names, a runner when families are configured, and the
///   direct/family name spaces disjoint under the prefix rule
///
/// It does **not** reject schedule entries: those are validated per cycle so
/// that one bad line never takes the supervisor down.
pub fn validate_config(cfg: &ConfigFile) -> Result<()> {
    if cfg.settings.poll_interval == 0 {
        return Err(anyhow!("[settings].poll_interval must be >= 1 (got 0)"));
    }

    ScriptRegistry::from_config(&cfg.scripts).context("invalid [scripts] section")?;

    Ok(())
}
