// src/config/mod.rs

//! Configuration loading and validation for scriptherd.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk (`loader.rs`), once at startup and again on
//!   every poll cycle (hot reload).
//! - Validate the invariants that must hold before the loop starts
//!   (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{load_and_validate, load_from_path};
pub use model::{ConfigFile, ScheduleValue, ScriptsSection, SettingsSection};
pub use validate::validate_config;
