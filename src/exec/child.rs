// src/exec/child.rs

//! Individual child process handling.

use std::process::{ExitStatus, Stdio};

use anyhow::{Context, Result};
use tokio::process::{Child, Command};
use tracing::{debug, error, info, warn};

/// What to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecSpec {
    /// Shell command line, run through `sh -c` (or `cmd /C` on Windows).
    pub cmd: String,
}

impl ExecSpec {
    pub fn new(cmd: impl Into<String>) -> Self {
        Self { cmd: cmd.into() }
    }
}

/// Spawn the command with inherited stdio.
///
/// The child is killed if its handle is dropped.
pub fn spawn_child(spec: &ExecSpec) -> Result<Child> {
    // Build a shell command appropriate for the platform.
    let mut cmd = if cfg!(windows) {
        let mut c = Command::new("cmd");
        c.arg("/C").arg(&spec.cmd);
        c
    } else {
        let mut c = Command::new("sh");
        c.arg("-c").arg(&spec.cmd);
        c
    };

    cmd.stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .kill_on_drop(true);

    let child = cmd
        .spawn()
        .with_context(|| format!("spawning `{}`", spec.cmd))?;

    info!(pid = child.id(), "starting `{}`", spec.cmd);
    Ok(child)
}

/// Kill a child that is still running and wait for it to go away.
pub async fn stop_child(child: &mut Child) {
    match child.try_wait() {
        Ok(Some(status)) => {
            debug!(?status, "child already exited");
            return;
        }
        Ok(None) => {}
        Err(e) => {
            warn!(error = %e, "failed to poll child status; killing anyway");
        }
    }

    if let Err(e) = child.kill().await {
        warn!(error = %e, "failed to kill child process");
    }
}

/// Log how a child that ended on its own went.
pub fn report_exit(status: ExitStatus) {
    if status.success() {
        info!("app exited cleanly");
    } else {
        error!(
            exit_code = status.code().unwrap_or(-1),
            "app crashed - waiting for file changes before starting..."
        );
    }
}
