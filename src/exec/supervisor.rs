// src/exec/supervisor.rs

//! Supervisor loop: at most one child at a time.

use std::io;
use std::process::ExitStatus;

use tokio::process::Child;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::engine::RestartRequest;
use crate::exec::child::{report_exit, spawn_child, stop_child, ExecSpec};

/// Spawn the background supervisor.
///
/// - The command is started immediately.
/// - Every [`RestartRequest`] kills the running child (if any) and starts a
///   new one.
/// - A child that exits on its own is reported and not restarted until the
///   next request.
/// - When every sender of `restart_rx` is gone the child is killed and the
///   task ends.
pub fn spawn_supervisor(
    spec: ExecSpec,
    mut restart_rx: mpsc::UnboundedReceiver<RestartRequest>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut child = start(&spec);

        loop {
            tokio::select! {
                request = restart_rx.recv() => match request {
                    Some(request) => {
                        debug!(files = request.paths.len(), "restart requested");
                        if let Some(mut running) = child.take() {
                            stop_child(&mut running).await;
                        }
                        child = start(&spec);
                    }
                    None => {
                        debug!("restart channel closed; stopping supervisor");
                        break;
                    }
                },
                status = wait_for(&mut child) => {
                    child = None;
                    match status {
                        Ok(status) => report_exit(status),
                        Err(e) => warn!(error = %e, "failed to wait for child process"),
                    }
                }
            }
        }

        if let Some(mut running) = child.take() {
            stop_child(&mut running).await;
        }
        info!("supervisor stopped");
    })
}

fn start(spec: &ExecSpec) -> Option<Child> {
    match spawn_child(spec) {
        Ok(child) => Some(child),
        Err(err) => {
            error!(error = %err, "failed to start command; waiting for file changes");
            None
        }
    }
}

async fn wait_for(child: &mut Option<Child>) -> io::Result<ExitStatus> {
    match child {
        Some(c) => c.wait().await,
        None => std::future::pending().await,
    }
}
