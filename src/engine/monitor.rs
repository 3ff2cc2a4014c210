// src/engine/monitor.rs

//! The monitor: one owned object holding the watch set, the change filter,
//! and the restart dispatch strategy.
//!
//! All of its handlers run on a single event loop ([`Monitor::run`]).
//! Watcher callbacks only enqueue [`MonitorEvent`]s, and the debounce timer
//! only enqueues [`MonitorEvent::DebounceFired`]; the restart itself is
//! always emitted from the loop, so nothing can be emitted after `reset`.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, info, trace};

use crate::engine::debounce::Debouncer;
use crate::engine::emitter::{RestartEmitter, RestartHandler};
use crate::engine::state::MonitorState;
use crate::engine::MonitorEvent;
use crate::errors::Result;
use crate::types::{MonitorPhase, PathStyle};
use crate::watch::{ChangeFilter, ChangePayload, IgnoreRule, MatchResult, WatchRegistry};

/// Everything the monitor needs from configuration.
#[derive(Debug, Clone, Default)]
pub struct MonitorSettings {
    pub dirs: Vec<PathBuf>,
    /// Ignore patterns (see [`IgnoreRule`]).
    pub ignore: Vec<String>,
    /// Match rules (see [`Matcher`](crate::watch::Matcher)).
    pub monitor: Vec<String>,
    pub ext: Vec<String>,
    /// Quiet period before a restart; zero restarts synchronously.
    pub delay: Duration,
    pub verbose: bool,
}

/// How matched changes reach the emitter. Chosen once, at construction.
enum Dispatch {
    Immediate(RestartEmitter),
    Debounced {
        emitter: RestartEmitter,
        debouncer: Debouncer<MatchResult>,
    },
}

/// Cloneable sender for [`MonitorEvent`]s.
///
/// Each method returns false once the monitor has gone away.
#[derive(Debug, Clone)]
pub struct MonitorHandle {
    tx: mpsc::UnboundedSender<MonitorEvent>,
}

impl MonitorHandle {
    pub fn watch(&self) -> bool {
        self.send(MonitorEvent::Watch)
    }

    pub fn reset(&self) -> bool {
        self.send(MonitorEvent::Reset)
    }

    pub fn shutdown(&self) -> bool {
        self.send(MonitorEvent::ShutdownRequested)
    }

    pub fn notify_change(&self, payload: impl Into<ChangePayload>) -> bool {
        self.send(MonitorEvent::Changed(payload.into()))
    }

    fn send(&self, event: MonitorEvent) -> bool {
        self.tx.send(event).is_ok()
    }
}

pub struct Monitor {
    dirs: Vec<PathBuf>,
    ignore: IgnoreRule,
    registry: WatchRegistry,
    filter: ChangeFilter,
    dispatch: Dispatch,
    events_tx: mpsc::UnboundedSender<MonitorEvent>,
    events_rx: mpsc::UnboundedReceiver<MonitorEvent>,
}

impl std::fmt::Debug for Monitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Monitor")
            .field("dirs", &self.dirs)
            .field("phase", &self.phase())
            .finish_non_exhaustive()
    }
}

impl Monitor {
    /// Build a monitor. Nothing is watched until [`watch`](Monitor::watch).
    ///
    /// Fails if the ignore patterns or match rules don't compile.
    pub fn new(
        settings: &MonitorSettings,
        handler: Arc<dyn RestartHandler>,
        state: Arc<MonitorState>,
    ) -> Result<Self> {
        let ignore = IgnoreRule::from_patterns(&settings.ignore)?;
        let filter = ChangeFilter::from_rules(&settings.monitor, &settings.ext, state)?;

        let (events_tx, events_rx) = mpsc::unbounded_channel();

        let emitter = RestartEmitter::new(handler, settings.verbose);
        let dispatch = if settings.delay.is_zero() {
            Dispatch::Immediate(emitter)
        } else {
            let fire_tx = events_tx.clone();
            let debouncer = Debouncer::new(
                move |generation| {
                    let _ = fire_tx.send(MonitorEvent::DebounceFired(generation));
                },
                settings.delay,
            );
            Dispatch::Debounced { emitter, debouncer }
        };

        Ok(Self {
            dirs: settings.dirs.clone(),
            ignore,
            registry: WatchRegistry::new(events_tx.clone()),
            filter,
            dispatch,
            events_tx,
            events_rx,
        })
    }

    /// Override how changed paths are normalized (defaults to the platform's).
    pub fn with_path_style(mut self, style: PathStyle) -> Self {
        self.filter = self.filter.with_path_style(style);
        self
    }

    pub fn handle(&self) -> MonitorHandle {
        MonitorHandle {
            tx: self.events_tx.clone(),
        }
    }

    /// Start watching every configured directory. No-op while watching.
    pub fn watch(&mut self) -> usize {
        self.registry.start_watching(&self.dirs, &self.ignore)
    }

    /// Close all watchers and cancel a pending restart.
    pub fn reset(&mut self) {
        self.registry.stop_watching();
        if let Dispatch::Debounced { debouncer, .. } = &mut self.dispatch {
            if debouncer.cancel() {
                debug!("cancelled pending restart on reset");
            }
        }
    }

    /// Filter one change notification and dispatch a restart if it matters.
    pub fn handle_change(&mut self, payload: ChangePayload) {
        let Some(pass) = self.filter.apply(payload) else {
            return;
        };
        if pass.matched.is_empty() {
            return;
        }

        match &mut self.dispatch {
            Dispatch::Immediate(emitter) => emitter.trigger_restart(pass.matched),
            Dispatch::Debounced { debouncer, .. } => {
                debug!("delaying restart for {}ms", debouncer.delay().as_millis());
                debouncer.call(pass.matched);
            }
        }
    }

    /// Emit the restart armed for `generation`, unless it was superseded or
    /// cancelled in the meantime.
    fn fire_pending(&mut self, generation: u64) {
        if let Dispatch::Debounced { emitter, debouncer } = &mut self.dispatch {
            match debouncer.take_fired(generation) {
                Some(matched) => emitter.trigger_restart(matched),
                None => trace!(generation, "ignoring superseded restart timer"),
            }
        }
    }

    pub fn active_watchers(&self) -> usize {
        self.registry.active_count()
    }

    pub fn is_restart_pending(&self) -> bool {
        match &self.dispatch {
            Dispatch::Debounced { debouncer, .. } => debouncer.is_pending(),
            Dispatch::Immediate(_) => false,
        }
    }

    pub fn phase(&self) -> MonitorPhase {
        if self.registry.is_empty() {
            MonitorPhase::Idle
        } else if self.is_restart_pending() {
            MonitorPhase::PendingRestart
        } else {
            MonitorPhase::Watching
        }
    }

    /// Wait for the next event. Never yields `None` while the monitor is
    /// alive, since it holds a sender itself.
    pub async fn next_event(&mut self) -> Option<MonitorEvent> {
        self.events_rx.recv().await
    }

    /// Handle one event. Returns false once the loop should stop.
    pub fn handle_event(&mut self, event: MonitorEvent) -> bool {
        trace!(?event, "monitor received event");
        match event {
            MonitorEvent::Changed(payload) => self.handle_change(payload),
            MonitorEvent::DebounceFired(generation) => self.fire_pending(generation),
            MonitorEvent::Watch => {
                self.watch();
            }
            MonitorEvent::Reset => self.reset(),
            MonitorEvent::ShutdownRequested => {
                info!("shutdown requested; closing watchers");
                self.reset();
                return false;
            }
        }
        true
    }

    /// Main event loop.
    ///
    /// Runs until [`MonitorEvent::ShutdownRequested`], which resets the
    /// monitor first. Nothing inside a single event can end the loop.
    pub async fn run(mut self) -> Result<()> {
        info!("monitor started");

        while let Some(event) = self.next_event().await {
            if !self.handle_event(event) {
                break;
            }
        }

        info!("monitor exiting");
        Ok(())
    }
}
