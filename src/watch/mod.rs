// src/watch/mod.rs

//! File watching and change detection.
//!
//! This module is responsible for:
//! - Keeping one recursive `notify` watcher per configured directory
//!   ([`registry`]).
//! - Dropping ignored and hidden paths as early as possible ([`ignore`]).
//! - Normalizing notifications and matching them against the user's rules
//!   and extension allow-list ([`filter`], [`matcher`]).
//!
//! It does **not** decide when to restart; that is the engine's job.

pub mod filter;
pub mod ignore;
pub mod matcher;
pub mod path_utils;
pub mod registry;

pub use filter::{
    filter_summary, normalize_drive_letter, normalize_payload, ChangeFilter, ChangePayload,
    FilterPass,
};
pub use ignore::IgnoreRule;
pub use matcher::{match_paths, MatchResult, Matcher};
pub use registry::{is_change_event, WatchRegistry, WatcherHandle};
