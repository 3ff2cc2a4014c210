// src/cli.rs

//! CLI argument parsing using `clap`.
//!
//! Every flag here overrides the matching field of the config file; see
//! `config::ConfigFile::apply_cli_overrides`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::default_config_path;

/// Command-line arguments for `relaunch`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "relaunch",
    version,
    about = "Run a command and restart it whenever watched files change.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// Defaults to `Relaunch.toml` in the current directory. A missing file
    /// is not an error; built-in defaults are used instead.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Directory to watch (repeatable). Replaces `watch.dirs`.
    #[arg(short = 'w', long = "watch", value_name = "DIR")]
    pub watch: Vec<String>,

    /// Extra ignore pattern (repeatable). Appended to `watch.ignore`.
    #[arg(short = 'i', long = "ignore", value_name = "PATTERN")]
    pub ignore: Vec<String>,

    /// Comma separated extension allow-list, e.g. `js,json`.
    #[arg(short = 'e', long = "ext", value_name = "EXTS", value_delimiter = ',')]
    pub ext: Vec<String>,

    /// Restart delay, e.g. `250ms`, `2s`, or a number of milliseconds.
    #[arg(short = 'd', long, value_name = "DELAY")]
    pub delay: Option<String>,

    /// Log every file considered and matched.
    #[arg(short = 'V', long)]
    pub verbose: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `RELAUNCH_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Resolve and print the configuration, but don't run anything.
    #[arg(long)]
    pub dry_run: bool,

    /// Command to supervise. Replaces `exec.cmd`.
    #[arg(last = true, value_name = "CMD")]
    pub command: Vec<String>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
impl CliArgs {
    /// The `--config` path, or [`default_config_path`] when it was not given.
    pub fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(default_config_path)
    }
}

pub fn parse() -> CliArgs {
    CliArgs::parse()
}
