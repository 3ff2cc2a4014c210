// src/config/validate.rs

use crate::cli::CliArgs;
use crate::config::model::{parse_duration, ConfigFile, RawConfigFile};
use crate::errors::{RelaunchError, Result};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = crate::errors::RelaunchError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        ensure_has_dirs(&raw)?;
        let delay = raw.watch.delay.to_duration().map_err(|e| {
            RelaunchError::ConfigError(format!("[watch].delay is invalid: {e}"))
        })?;
        Ok(ConfigFile::new_unchecked(raw.watch, raw.exec, delay))
    }
}

fn ensure_has_dirs(cfg: &RawConfigFile) -> Result<()> {
    if cfg.watch.dirs.iter().all(|d| d.trim().is_empty()) {
        return Err(RelaunchError::ConfigError(
            "[watch].dirs must name at least one directory".to_string(),
        ));
    }
    Ok(())
}

impl ConfigFile {
    /// Layer command-line flags on top of the file configuration.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) -> Result<()> {
        if !args.watch.is_empty() {
            self.watch.dirs = args.watch.clone();
        }
        self.watch.ignore.extend(args.ignore.iter().cloned());
        if !args.ext.is_empty() {
            self.watch.ext = args
                .ext
                .iter()
                .map(|e| e.trim().to_string())
                .filter(|e| !e.is_empty())
                .collect();
        }
        if let Some(ref delay) = args.delay {
            let delay = parse_duration(delay)
                .map_err(|e| RelaunchError::ConfigError(format!("--delay is invalid: {e}")))?;
            self.set_delay(delay);
        }
        if args.verbose {
            self.watch.verbose = true;
        }
        if !args.command.is_empty() {
            self.exec.cmd = Some(args.command.join(" "));
        }
        Ok(())
    }

    /// The command to supervise, or an error if none was configured.
    pub fn require_command(&self) -> Result<&str> {
        match self.exec.cmd.as_deref().map(str::trim) {
            Some(cmd) if !cmd.is_empty() => Ok(cmd),
            _ => Err(RelaunchError::ConfigError(
                "no command to run: set [exec].cmd or pass one after `--`".to_string(),
            )),
        }
    }
}
