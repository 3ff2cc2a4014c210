use std::fmt;

/// How changed paths should be normalized before matching.
///
/// On platforms whose paths start with a case-insensitive drive letter the
/// same file can be reported as `c:\foo` or `C:\foo`; `DriveLetter` folds the
/// first character to upper case so comparisons downstream are stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathStyle {
    Posix,
    DriveLetter,
}

impl PathStyle {
    /// Style of the platform we were compiled for.
    pub fn native() -> Self {
        if cfg!(windows) {
            PathStyle::DriveLetter
        } else {
            PathStyle::Posix
        }
    }
}

impl Default for PathStyle {
    fn default() -> Self {
        PathStyle::native()
    }
}

/// Lifecycle of a watch session.
///
/// - `Idle`: no watchers are registered (initial state, and after a reset).
/// - `Watching`: watchers active, no restart waiting on the debounce timer.
/// - `PendingRestart`: a debounced restart is armed and has not fired yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorPhase {
    Idle,
    Watching,
    PendingRestart,
}

impl fmt::Display for MonitorPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MonitorPhase::Idle => "idle",
            MonitorPhase::Watching => "watching",
            MonitorPhase::PendingRestart => "pending-restart",
        };
        f.write_str(s)
    }
}
