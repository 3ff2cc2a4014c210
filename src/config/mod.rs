// src/config/mod.rs

//! Configuration loading and validation for relaunch.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk (`loader.rs`).
//! - Resolve it, and layer CLI flags on top (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_config_path, load_and_validate, load_from_path, load_or_default};
pub use model::{
    parse_duration, ConfigFile, DelaySpec, ExecSection, RawConfigFile, WatchSection,
    DEFAULT_IGNORE,
};
