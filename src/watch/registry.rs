// src/watch/registry.rs

use std::fmt;
use std::path::{Path, PathBuf};

use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::engine::MonitorEvent;
use crate::errors::Result;
use crate::watch::filter::ChangePayload;
use crate::watch::ignore::IgnoreRule;

/// Handle for one directory watcher.
///
/// The underlying `RecommendedWatcher` unregisters its OS watch when dropped,
/// so dropping the handle closes the watcher.
pub struct WatcherHandle {
    dir: PathBuf,
    _inner: RecommendedWatcher,
}

impl fmt::Debug for WatcherHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WatcherHandle")
            .field("dir", &self.dir)
            .finish_non_exhaustive()
    }
}

impl WatcherHandle {
    /// Directory this watcher observes (canonicalized when possible).
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

/// Whether a notify event describes a content change worth filtering.
///
/// Access events (open/read/close) never count.
pub fn is_change_event(kind: &EventKind) -> bool {
    matches!(
        kind,
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
    )
}

/// Owns the set of active directory watchers.
///
/// The set is empty unless a watch session is active. Every watcher forwards
/// its (already ignore-filtered) changes as [`MonitorEvent::Changed`] into
/// the monitor's event channel.
#[derive(Debug)]
pub struct WatchRegistry {
    watchers: Vec<WatcherHandle>,
    events_tx: mpsc::UnboundedSender<MonitorEvent>,
}

impl WatchRegistry {
    pub fn new(events_tx: mpsc::UnboundedSender<MonitorEvent>) -> Self {
        Self {
            watchers: Vec::new(),
            events_tx,
        }
    }

    /// Start one recursive watcher per directory.
    ///
    /// Idempotent: while watchers are active this is a no-op. A directory that
    /// can't be watched is logged and skipped; the others are still watched.
    /// Returns the number of active watchers.
    pub fn start_watching(&mut self, dirs: &[PathBuf], ignore: &IgnoreRule) -> usize {
        if !self.watchers.is_empty() {
            debug!(
                active = self.watchers.len(),
                "watchers already active; ignoring watch request"
            );
            return self.watchers.len();
        }

        for dir in dirs {
            match spawn_dir_watcher(dir, ignore.clone(), self.events_tx.clone()) {
                Ok(handle) => self.watchers.push(handle),
                Err(err) => {
                    warn!(dir = ?dir, error = %err, "failed to watch directory; skipping it");
                }
            }
        }

        info!(dirs = ?self.watched_dirs(), "watching for file changes");
        self.watchers.len()
    }

    /// Close every watcher and empty the set. Safe to call when idle.
    pub fn stop_watching(&mut self) {
        debug!(closing = self.watchers.len(), "resetting watchers");
        self.watchers.clear();
    }

    pub fn active_count(&self) -> usize {
        self.watchers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.watchers.is_empty()
    }

    pub fn watched_dirs(&self) -> Vec<&Path> {
        self.watchers.iter().map(|w| w.dir()).collect()
    }
}

fn spawn_dir_watcher(
    dir: &Path,
    ignore: IgnoreRule,
    events_tx: mpsc::UnboundedSender<MonitorEvent>,
) -> Result<WatcherHandle> {
    // Canonicalize once so ignore checks see the same prefix notify reports.
    let root = dir.canonicalize().unwrap_or_else(|_| dir.to_path_buf());
    let callback_root = root.clone();

    // Called synchronously on notify's own thread.
    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| match res {
            Ok(event) => {
                if !is_change_event(&event.kind) {
                    return;
                }
                let paths: Vec<PathBuf> = event
                    .paths
                    .into_iter()
                    .filter(|p| !ignore.is_ignored(&callback_root, p))
                    .collect();
                if paths.is_empty() {
                    return;
                }
                if let Err(err) = events_tx.send(MonitorEvent::Changed(ChangePayload::Batch(paths))) {
                    debug!("monitor gone; dropping file change: {err}");
                }
            }
            Err(err) => {
                warn!("file watch error: {err}");
            }
        },
        Config::default(),
    )?;

    watcher.watch(&root, RecursiveMode::Recursive)?;
    debug!(dir = ?root, "directory watcher started");

    Ok(WatcherHandle {
        dir: root,
        _inner: watcher,
    })
}

#[cfg(test)]
mod tests {
    use notify::event::{AccessKind, CreateKind, ModifyKind};

    use super::*;

    #[test]
    fn only_content_changes_count() {
        assert!(is_change_event(&EventKind::Modify(ModifyKind::Any)));
        assert!(is_change_event(&EventKind::Create(CreateKind::File)));
        assert!(!is_change_event(&EventKind::Access(AccessKind::Any)));
        assert!(!is_change_event(&EventKind::Other));
    }

    #[test]
    fn stop_on_empty_registry_is_harmless() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut registry = WatchRegistry::new(tx);
        registry.stop_watching();
        assert!(registry.is_empty());
    }
}
