// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod types;
pub mod watch;

use std::sync::Arc;

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::cli::CliArgs;
use crate::config::{load_or_default, ConfigFile};
use crate::engine::{Monitor, MonitorState, RestartRequest};
use crate::exec::{spawn_supervisor, ExecSpec};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading (file + CLI overrides)
/// - the process supervisor
/// - the monitor (watchers, change filter, debounce, restart emitter)
/// - Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<()> {
    let config_path = args.config_path();
    let mut cfg = load_or_default(&config_path)?;
    cfg.apply_cli_overrides(&args)?;

    if args.dry_run {
        print_dry_run(&cfg);
        return Ok(());
    }

    let command = cfg.require_command()?.to_string();
    let settings = cfg.monitor_settings();

    info!("watching path(s): {}", cfg.watch.dirs.join(" "));
    if !settings.ext.is_empty() {
        info!("watching extensions: {}", settings.ext.join(","));
    }

    // Restart requests flow from the monitor into the supervisor.
    let (restart_tx, restart_rx) = mpsc::unbounded_channel::<RestartRequest>();

    let state = Arc::new(MonitorState::new());
    let mut monitor = Monitor::new(&settings, Arc::new(restart_tx), state)?;
    let handle = monitor.handle();

    let supervisor = spawn_supervisor(ExecSpec::new(command), restart_rx);

    if monitor.watch() == 0 {
        warn!("no directory could be watched; the command will never be restarted");
    }

    // Ctrl-C → graceful shutdown.
    {
        let handle = handle.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("failed to listen for Ctrl+C: {e}");
                return;
            }
            handle.shutdown();
        });
    }

    // Consumes the monitor; dropping it closes the restart channel, which
    // stops the supervisor and its child.
    monitor.run().await?;

    if let Err(e) = supervisor.await {
        warn!("supervisor task ended abnormally: {e}");
    }

    Ok(())
}

/// Simple dry-run output: print the resolved configuration.
fn print_dry_run(cfg: &ConfigFile) {
    println!("relaunch dry-run");
    println!("  dirs: {:?}", cfg.watch.dirs);
    println!("  ignore: {:?}", cfg.effective_ignore());
    if !cfg.watch.monitor.is_empty() {
        println!("  monitor: {:?}", cfg.watch.monitor);
    }
    if !cfg.watch.ext.is_empty() {
        println!("  ext: {:?}", cfg.watch.ext);
    }
    println!("  delay: {}ms", cfg.delay().as_millis());
    println!("  verbose: {}", cfg.watch.verbose);
    match cfg.exec.cmd {
        Some(ref cmd) => println!("  cmd: {cmd}"),
        None => println!("  cmd: (none)"),
    }

    debug!("dry-run complete (nothing started)");
}
