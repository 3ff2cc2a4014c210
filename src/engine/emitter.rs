// src/engine/emitter.rs

//! Restart emitter: the sink of the change-detection pipeline.
//!
//! The emitter never touches processes. It logs, then hands the matched paths
//! to a [`RestartHandler`]; in production that is the channel into the
//! process supervisor (`crate::exec`), in tests it is usually a recorder.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::logging::raw_line;
use crate::watch::path_utils::{current_dir_or_dot, relative_display};
use crate::watch::MatchResult;

/// Status line emitted on every restart. Other tooling greps for it.
pub const RESTART_MESSAGE: &str = "restarting due to changes...";

/// A request to restart the supervised process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestartRequest {
    /// Matched absolute paths, in the order they were reported.
    pub paths: Vec<PathBuf>,
}

/// Outbound seam: whoever consumes restart requests.
pub trait RestartHandler: Send + Sync {
    fn restart_requested(&self, request: RestartRequest);
}

impl RestartHandler for mpsc::UnboundedSender<RestartRequest> {
    fn restart_requested(&self, request: RestartRequest) {
        if let Err(err) = self.send(request) {
            warn!("restart requested but the supervisor is gone: {err}");
        }
    }
}

/// Destination of raw (unformatted) output lines.
pub type RawSink = Arc<dyn Fn(&str) + Send + Sync>;

#[derive(Clone)]
pub struct RestartEmitter {
    handler: Arc<dyn RestartHandler>,
    verbose: bool,
    cwd: PathBuf,
    raw: RawSink,
}

impl fmt::Debug for RestartEmitter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RestartEmitter")
            .field("verbose", &self.verbose)
            .finish_non_exhaustive()
    }
}

impl RestartEmitter {
    pub fn new(handler: Arc<dyn RestartHandler>, verbose: bool) -> Self {
        Self {
            handler,
            verbose,
            cwd: current_dir_or_dot(),
            raw: Arc::new(raw_line),
        }
    }

    /// Send raw output somewhere other than [`raw_line`].
    pub fn with_raw_sink<F>(mut self, sink: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.raw = Arc::new(sink);
        self
    }

    pub fn with_cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = cwd.into();
        self
    }

    /// Log the restart and raise a [`RestartRequest`] carrying the matched paths.
    pub fn trigger_restart(&self, matched: MatchResult) {
        info!("{RESTART_MESSAGE}");
        for file in &matched.result {
            debug!("{}", relative_display(&self.cwd, file));
        }

        if self.verbose {
            (self.raw)("");
        }

        self.handler.restart_requested(RestartRequest {
            paths: matched.result,
        });
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    #[test]
    fn forwards_matched_paths_in_order() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let emitter = RestartEmitter::new(Arc::new(tx), false);

        let matched = MatchResult {
            result: vec![PathBuf::from("/p/b.js"), PathBuf::from("/p/a.js")],
            ignored: 0,
            total: 2,
        };
        emitter.trigger_restart(matched);

        let req = rx.try_recv().expect("restart request");
        assert_eq!(req.paths, vec![PathBuf::from("/p/b.js"), PathBuf::from("/p/a.js")]);
    }

    fn raw_recorder() -> (Arc<Mutex<Vec<String>>>, impl Fn(&str) + Send + Sync + 'static) {
        let lines = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&lines);
        (lines, move |line: &str| sink.lock().unwrap().push(line.to_string()))
    }

    fn one_match() -> MatchResult {
        MatchResult {
            result: vec![PathBuf::from("/p/a.js")],
            ignored: 0,
            total: 1,
        }
    }

    #[test]
    fn verbose_mode_writes_a_blank_separator_before_the_request() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let (lines, sink) = raw_recorder();

        RestartEmitter::new(Arc::new(tx), true)
            .with_raw_sink(sink)
            .trigger_restart(one_match());

        assert_eq!(*lines.lock().unwrap(), vec![String::new()]);
        assert!(rx.try_recv().is_ok());
    }

    #[test]
    fn quiet_mode_writes_no_raw_output() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let (lines, sink) = raw_recorder();

        RestartEmitter::new(Arc::new(tx), false)
            .with_raw_sink(sink)
            .trigger_restart(one_match());

        assert!(lines.lock().unwrap().is_empty());
    }

    #[test]
    fn closed_channel_does_not_panic() {
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);
        RestartEmitter::new(Arc::new(tx), true).trigger_restart(MatchResult::default());
    }
}
