// src/exec/mod.rs

//! Process dispatch layer.
//!
//! Starts resolved scripts as independent OS processes via
//! `tokio::process::Command`. Processes are fully detached: the supervisor
//! never blocks on them, never consumes their output, and never kills them,
//! so a crash or hang inside a script cannot corrupt or stall the loop, and
//! a supervisor shutdown leaves started scripts running to completion.

pub mod dispatcher;

pub use dispatcher::{Dispatcher, scripts_root};
