// src/engine/state.rs

use std::sync::Mutex;
use std::time::SystemTime;

/// Process-wide monitor state shared between the change filter and anything
/// that needs to know when the last restart check happened.
///
/// The change filter is the only writer.
#[derive(Debug, Default)]
pub struct MonitorState {
    last_started: Mutex<Option<SystemTime>>,
}

impl MonitorState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record "now" as the last time a restart check ran.
    pub fn mark_started(&self) -> SystemTime {
        let now = SystemTime::now();
        let mut guard = self.last_started.lock().unwrap_or_else(|p| p.into_inner());
        *guard = Some(now);
        now
    }

    pub fn last_started(&self) -> Option<SystemTime> {
        *self.last_started.lock().unwrap_or_else(|p| p.into_inner())
    }

    /// A file modified at or before the last check is stale.
    ///
    /// Before the first check nothing is stale.
    pub fn is_stale(&self, modified: SystemTime) -> bool {
        match self.last_started() {
            Some(last) => modified <= last,
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn nothing_is_stale_before_first_check() {
        let state = MonitorState::new();
        assert!(state.last_started().is_none());
        assert!(!state.is_stale(SystemTime::UNIX_EPOCH));
    }

    #[test]
    fn only_later_modifications_are_fresh() {
        let state = MonitorState::new();
        let at = state.mark_started();
        assert_eq!(state.last_started(), Some(at));
        assert!(state.is_stale(at - Duration::from_secs(1)));
        assert!(!state.is_stale(at + Duration::from_secs(1)));
    }
}
