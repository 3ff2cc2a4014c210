// src/logging.rs

//! Logging setup for `relaunch` using `tracing` + `tracing-subscriber`.
//!
//! Priority for determining the log level:
//! 1. `--log-level` CLI flag (if provided)
//! 2. `RELAUNCH_LOG` environment variable (e.g. "info", "debug")
//! 3. `debug` when `--verbose` is set, otherwise `info`
//!
//! Logs are sent to STDERR so that stdout belongs to the supervised child.
//!
//! Severity mapping used across the crate:
//! - status messages (`restarting due to changes...`) are `info!`
//! - detail messages (paths, filter counts, delays) are `debug!`
//! - raw output (blank separator lines) goes through [`raw_line`]

use anyhow::Result;
use tracing_subscriber::fmt;

use crate::cli::LogLevel;

/// Initialise global logging subscriber.
///
/// Safe to call once at startup.
pub fn init_logging(cli_level: Option<LogLevel>, verbose: bool) -> Result<()> {
    let level = resolve_level(
        cli_level,
        std::env::var("RELAUNCH_LOG").ok().as_deref(),
        verbose,
    );

    fmt()
        .with_max_level(level)
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}

/// Write an unformatted line to the log stream.
pub fn raw_line(line: &str) {
    eprintln!("{line}");
}

fn resolve_level(
    cli_level: Option<LogLevel>,
    env_level: Option<&str>,
    verbose: bool,
) -> tracing::Level {
    if let Some(lvl) = cli_level {
        return level_from_log_level(lvl);
    }
    if let Some(lvl) = env_level.and_then(parse_level_str) {
        return lvl;
    }
    if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    }
}

fn level_from_log_level(lvl: LogLevel) -> tracing::Level {
    match lvl {
        LogLevel::Error => tracing::Level::ERROR,
        LogLevel::Warn => tracing::Level::WARN,
        LogLevel::Info => tracing::Level::INFO,
        LogLevel::Debug => tracing::Level::DEBUG,
        LogLevel::Trace => tracing::Level::TRACE,
    }
}

fn parse_level_str(s: &str) -> Option<tracing::Level> {
    match s.trim().to_lowercase().as_str() {
        "error" => Some(tracing::Level::ERROR),
        "warn" | "warning" => Some(tracing::Level::WARN),
        "info" => Some(tracing::Level::INFO),
        "debug" => Some(tracing::Level::DEBUG),
        "trace" => Some(tracing::Level::TRACE),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_flag_wins_over_env_and_verbose() {
        let lvl = resolve_level(Some(LogLevel::Warn), Some("trace"), true);
        assert_eq!(lvl, tracing::Level::WARN);
    }

    #[test]
    fn env_wins_over_verbose() {
        assert_eq!(resolve_level(None, Some(" Error "), true), tracing::Level::ERROR);
    }

    #[test]
    fn verbose_enables_detail_messages() {
        assert_eq!(resolve_level(None, None, true), tracing::Level::DEBUG);
        assert_eq!(resolve_level(None, Some("bogus"), false), tracing::Level::INFO);
    }
}
