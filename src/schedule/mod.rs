// src/schedule/mod.rs

//! Schedule representation and time-match evaluation.
//!
//! Responsibilities:
//! - Flatten the configured mapping into a uniform entry list (`model.rs`).
//! - Parse time-spec strings and decide whether "now" is a firing instant
//!   (`timespec.rs`). Evaluation is a pure function of (spec, now); all
//!   firing-window bookkeeping lives in the supervisor.

pub mod model;
pub mod timespec;

pub use model::{ScheduleEntry, ScheduleIssue, SpecStatus, flatten, validate_entries};
pub use timespec::{TimeSpec, firing_window};
