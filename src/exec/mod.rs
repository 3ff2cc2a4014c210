// src/exec/mod.rs

//! Process execution layer.
//!
//! A small supervisor: it runs the configured command with
//! `tokio::process::Command`, and kills and respawns it for every
//! [`RestartRequest`](crate::engine::RestartRequest) it receives.
//!
//! - [`child`] spawns and stops a single child process.
//! - [`supervisor`] owns the loop reacting to restart requests and child exits.

pub mod child;
pub mod supervisor;

pub use child::{spawn_child, stop_child, ExecSpec};
pub use supervisor::spawn_supervisor;
