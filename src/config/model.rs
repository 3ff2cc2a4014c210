// src/config/model.rs

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::engine::MonitorSettings;

/// Ignore patterns that are always applied, before any user patterns.
pub const DEFAULT_IGNORE: &[&str] = &[".git", "node_modules", "bower_components", ".sass-cache"];

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [watch]
/// dirs = ["src", "lib"]
/// ignore = ["dist/**"]
/// monitor = ["*.js", "!test/**"]
/// ext = ["js", "json"]
/// delay = "200ms"
/// verbose = true
///
/// [exec]
/// cmd = "node app.js"
/// ```
///
/// All sections are optional and have reasonable defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawConfigFile {
    /// `[watch]` section.
    #[serde(default)]
    pub watch: WatchSection,

    /// `[exec]` section.
    #[serde(default)]
    pub exec: ExecSection,
}

/// Validated configuration.
///
/// Built from [`RawConfigFile`] through `TryFrom` (see `validate.rs`), which
/// also resolves the delay into a [`Duration`].
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub watch: WatchSection,
    pub exec: ExecSection,
    delay: Duration,
}

/// `[watch]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct WatchSection {
    /// Directories to watch recursively.
    #[serde(default = "default_dirs")]
    pub dirs: Vec<String>,

    /// Ignore patterns, appended to [`DEFAULT_IGNORE`].
    ///
    /// `*` matches within one path segment, `**` across segments.
    #[serde(default)]
    pub ignore: Vec<String>,

    /// Match rules (globs). A leading `!` makes a rule an exclude rule.
    ///
    /// An empty list means every file is relevant.
    #[serde(default)]
    pub monitor: Vec<String>,

    /// Extension allow-list, e.g. `["js", "json"]`. Empty = any extension.
    #[serde(default)]
    pub ext: Vec<String>,

    /// Quiet period before restarting. `0` restarts immediately.
    #[serde(default)]
    pub delay: DelaySpec,

    /// Log every file considered and matched.
    #[serde(default)]
    pub verbose: bool,
}

fn default_dirs() -> Vec<String> {
    vec![".".to_string()]
}

impl Default for WatchSection {
    fn default() -> Self {
        Self {
            dirs: default_dirs(),
            ignore: Vec::new(),
            monitor: Vec::new(),
            ext: Vec::new(),
            delay: DelaySpec::default(),
            verbose: false,
        }
    }
}

/// `[exec]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExecSection {
    /// Shell command to supervise.
    #[serde(default)]
    pub cmd: Option<String>,
}

/// A delay given either as an integer number of milliseconds or as a
/// duration string like `"250ms"` or `"2s"`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum DelaySpec {
    Millis(u64),
    Text(String),
}

impl Default for DelaySpec {
    fn default() -> Self {
        DelaySpec::Millis(0)
    }
}

impl DelaySpec {
    pub fn to_duration(&self) -> Result<Duration, String> {
        match self {
            DelaySpec::Millis(ms) => Ok(Duration::from_millis(*ms)),
            DelaySpec::Text(s) => parse_duration(s),
        }
    }
}

/// Parse a simple duration string like `"3s"`, `"250ms"`, `"1m"`, `"2h"`.
///
/// A bare number (`"200"`) is read as milliseconds.
pub fn parse_duration(s: &str) -> Result<Duration, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty duration string".to_string());
    }

    let idx = s.chars().position(|c| !c.is_ascii_digit()).unwrap_or(s.len());

    let (num_part, unit_part) = s.split_at(idx);
    let value: u64 = num_part
        .parse()
        .map_err(|e| format!("invalid duration number '{}': {}", num_part, e))?;
    let unit = unit_part.trim().to_lowercase();

    match unit.as_str() {
        "" | "ms" => Ok(Duration::from_millis(value)),
        "s" => Ok(Duration::from_secs(value)),
        "m" => scaled_secs(value, 60),
        "h" => scaled_secs(value, 60 * 60),
        _ => Err(format!(
            "unsupported duration unit '{}'; expected ms, s, m, or h",
            unit
        )),
    }
}

fn scaled_secs(value: u64, unit_secs: u64) -> Result<Duration, String> {
    value
        .checked_mul(unit_secs)
        .map(Duration::from_secs)
        .ok_or_else(|| format!("duration '{value}' is too large"))
}

impl ConfigFile {
    pub(crate) fn new_unchecked(watch: WatchSection, exec: ExecSection, delay: Duration) -> Self {
        Self { watch, exec, delay }
    }

    /// Resolved restart delay.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub(crate) fn set_delay(&mut self, delay: Duration) {
        self.delay = delay;
    }

    /// Default ignore patterns followed by the user's own.
    pub fn effective_ignore(&self) -> Vec<String> {
        DEFAULT_IGNORE
            .iter()
            .map(|s| s.to_string())
            .chain(self.watch.ignore.iter().cloned())
            .collect()
    }

    /// Settings for the [`Monitor`](crate::engine::Monitor).
    pub fn monitor_settings(&self) -> MonitorSettings {
        MonitorSettings {
            dirs: self.watch.dirs.iter().map(PathBuf::from).collect(),
            ignore: self.effective_ignore(),
            monitor: self.watch.monitor.clone(),
            ext: self.watch.ext.clone(),
            delay: self.delay,
            verbose: self.watch.verbose,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_duration_units() {
        assert_eq!(parse_duration("250ms"), Ok(Duration::from_millis(250)));
        assert_eq!(parse_duration("2s"), Ok(Duration::from_secs(2)));
        assert_eq!(parse_duration("1m"), Ok(Duration::from_secs(60)));
        assert_eq!(parse_duration(" 200 "), Ok(Duration::from_millis(200)));
        assert!(parse_duration("ms").is_err());
        assert!(parse_duration("3 weeks").is_err());
    }

    #[test]
    fn oversized_durations_are_rejected_not_wrapped() {
        let huge = format!("{}h", u64::MAX / 60);
        assert!(parse_duration(&huge).unwrap_err().contains("too large"));
        assert!(parse_duration(&format!("{}m", u64::MAX)).is_err());
        assert_eq!(
            parse_duration(&format!("{}s", u64::MAX)),
            Ok(Duration::from_secs(u64::MAX))
        );
    }

    #[test]
    fn delay_accepts_integer_or_string() {
        let raw: RawConfigFile = toml::from_str("[watch]\ndelay = 150\n").unwrap();
        assert_eq!(raw.watch.delay.to_duration(), Ok(Duration::from_millis(150)));

        let raw: RawConfigFile = toml::from_str("[watch]\ndelay = \"1s\"\n").unwrap();
        assert_eq!(raw.watch.delay.to_duration(), Ok(Duration::from_secs(1)));
    }

    #[test]
    fn empty_file_uses_defaults() {
        let raw: RawConfigFile = toml::from_str("").unwrap();
        assert_eq!(raw.watch.dirs, vec!["."]);
        assert_eq!(raw.watch.delay, DelaySpec::Millis(0));
        assert!(raw.exec.cmd.is_none());
    }
}
