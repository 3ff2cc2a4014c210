// src/engine/mod.rs

//! Restart coordination for relaunch.
//!
//! This module ties together:
//! - the watch registry and change filter (from [`crate::watch`])
//! - the debounce coordinator ([`debounce`])
//! - the restart emitter and its outbound [`RestartHandler`] seam ([`emitter`])
//! - the shared [`MonitorState`] ([`state`])
//!
//! The owned supervisor object and its single event loop live in
//! [`monitor`].

use crate::watch::ChangePayload;

/// Events flowing into the monitor from watchers, signal handlers, etc.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MonitorEvent {
    /// A watcher reported changed paths.
    Changed(ChangePayload),
    /// The debounce timer armed for this generation ran out.
    DebounceFired(u64),
    /// Start watching the configured directories (no-op while watching).
    Watch,
    /// Close every watcher and cancel any pending restart.
    Reset,
    /// Reset, then leave the event loop.
    ShutdownRequested,
}

pub mod debounce;
pub mod emitter;
pub mod monitor;
pub mod state;

pub use debounce::Debouncer;
pub use emitter::{RawSink, RestartEmitter, RestartHandler, RestartRequest, RESTART_MESSAGE};
pub use monitor::{Monitor, MonitorHandle, MonitorSettings};
pub use state::MonitorState;
