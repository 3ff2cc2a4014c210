use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use relaunch::engine::{RestartHandler, RestartRequest};

/// A restart handler that just remembers every request it receives.
#[derive(Debug, Clone, Default)]
pub struct RecordingHandler {
    requests: Arc<Mutex<Vec<RestartRequest>>>,
}

impl RecordingHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn requests(&self) -> Vec<RestartRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// Paths of the most recent request, if any.
    pub fn last_paths(&self) -> Option<Vec<PathBuf>> {
        self.requests.lock().unwrap().last().map(|r| r.paths.clone())
    }
}

impl RestartHandler for RecordingHandler {
    fn restart_requested(&self, request: RestartRequest) {
        self.requests.lock().unwrap().push(request);
    }
}
