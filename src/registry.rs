// src/registry.rs

//! The closed set of launchable script names.
//!
//! Two disjoint name spaces, resolved to a dispatch kind:
//!
//! - *direct* scripts: exact names, each with its own entry point;
//! - *family* scripts: a name belongs to a family when it **starts with** a
//!   registered family base name, and is launched through the shared runner
//!   entry point with the name as its argument.
//!
//! Overlaps are rejected when the registry is built, never resolved silently
//! at dispatch time: no direct name may match a family prefix, and no family
//! base may be a prefix of another (which also makes the matching base unique
//! whenever one exists).

use std::collections::BTreeSet;

use crate::config::model::ScriptsSection;
use crate::errors::RegistryError;

/// How a resolved script is launched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchKind {
    /// Dedicated zero-argument entry point named after the script itself.
    Direct { script: String },
    /// Shared runner entry point, invoked with the script name as argument.
    Family { runner: String, script: String },
}

impl DispatchKind {
    /// The script name this dispatch is for.
    pub fn script(&self) -> &str {
        match self {
            DispatchKind::Direct { script } => script,
            DispatchKind::Family { script, .. } => script,
        }
    }
}

/// Registry mapping script names to their dispatch kind.
#[derive(Debug, Clone)]
pub struct ScriptRegistry {
    direct: BTreeSet<String>,
    family: Vec<String>,
    runner: Option<String>,
}

impl ScriptRegistry {
    /// Build and validate a registry from the `[scripts]` config section.
    pub fn from_config(cfg: &ScriptsSection) -> Result<Self, RegistryError> {
        if cfg.direct.is_empty() && cfg.family.is_empty() {
            return Err(RegistryError::EmptyRegistry);
        }

        let mut direct = BTreeSet::new();
        for name in &cfg.direct {
            if !direct.insert(name.clone()) {
                return Err(RegistryError::DuplicateName(name.clone()));
            }
        }

        let mut family: Vec<String> = Vec::new();
        for name in &cfg.family {
            if direct.contains(name) || family.contains(name) {
                return Err(RegistryError::DuplicateName(name.clone()));
            }
            family.push(name.clone());
        }

        if !family.is_empty() && cfg.runner.is_none() {
            return Err(RegistryError::MissingRunner);
        }

        for name in &direct {
            if let Some(base) = family.iter().find(|f| name.starts_with(f.as_str())) {
                return Err(RegistryError::AmbiguousName {
                    name: name.clone(),
                    family: base.clone(),
                });
            }
        }

        for a in &family {
            for b in &family {
                if a != b && b.starts_with(a.as_str()) {
                    return Err(RegistryError::OverlappingFamilies {
                        shorter: a.clone(),
                        longer: b.clone(),
                    });
                }
            }
        }

        Ok(Self {
            direct,
            family,
            runner: cfg.runner.clone(),
        })
    }

    /// Resolve a name to its dispatch kind, or reject it.
    pub fn resolve(&self, name: &str) -> Result<DispatchKind, RegistryError> {
        if self.direct.contains(name) {
            return Ok(DispatchKind::Direct {
                script: name.to_string(),
            });
        }

        if self.family.iter().any(|f| name.starts_with(f.as_str())) {
            // Construction guarantees a runner whenever families exist.
            if let Some(runner) = &self.runner {
                return Ok(DispatchKind::Family {
                    runner: runner.clone(),
                    script: name.to_string(),
                });
            }
        }

        Err(RegistryError::UnknownScript(name.to_string()))
    }

    /// Whether `name` resolves at all.
    pub fn is_known(&self, name: &str) -> bool {
        self.resolve(name).is_ok()
    }

    /// Direct script names, in order.
    pub fn direct_names(&self) -> impl Iterator<Item = &str> {
        self.direct.iter().map(|s| s.as_str())
    }

    /// Family base names, in configured order.
    pub fn family_bases(&self) -> &[String] {
        &self.family
    }
}
