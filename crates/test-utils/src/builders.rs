#![allow(dead_code)]

use std::path::PathBuf;
use std::time::Duration;

use relaunch::config::{ConfigFile, RawConfigFile};
use relaunch::engine::MonitorSettings;

/// Builder for `MonitorSettings` to simplify test setup.
pub struct SettingsBuilder {
    settings: MonitorSettings,
}

impl SettingsBuilder {
    pub fn new() -> Self {
        Self {
            settings: MonitorSettings::default(),
        }
    }

    pub fn dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.settings.dirs.push(dir.into());
        self
    }

    pub fn ignore(mut self, pattern: &str) -> Self {
        self.settings.ignore.push(pattern.to_string());
        self
    }

    pub fn rule(mut self, rule: &str) -> Self {
        self.settings.monitor.push(rule.to_string());
        self
    }

    pub fn ext(mut self, ext: &str) -> Self {
        self.settings.ext.push(ext.to_string());
        self
    }

    pub fn delay_ms(mut self, ms: u64) -> Self {
        self.settings.delay = Duration::from_millis(ms);
        self
    }

    pub fn verbose(mut self, val: bool) -> Self {
        self.settings.verbose = val;
        self
    }

    pub fn build(self) -> MonitorSettings {
        self.settings
    }
}

impl Default for SettingsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `ConfigFile`.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile::default(),
        }
    }

    pub fn dirs(mut self, dirs: &[&str]) -> Self {
        self.config.watch.dirs = dirs.iter().map(|d| d.to_string()).collect();
        self
    }

    pub fn rule(mut self, rule: &str) -> Self {
        self.config.watch.monitor.push(rule.to_string());
        self
    }

    pub fn cmd(mut self, cmd: &str) -> Self {
        self.config.exec.cmd = Some(cmd.to_string());
        self
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}
