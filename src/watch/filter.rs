// src/watch/filter.rs

//! The change filter: turns one raw change notification into a match result.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, trace};

use crate::engine::MonitorState;
use crate::types::PathStyle;
use crate::errors::Result;
use crate::watch::matcher::{MatchResult, Matcher};
use crate::watch::path_utils::{current_dir_or_dot, join_relative};

/// Payload of a single change notification: one path or a batch of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangePayload {
    Single(PathBuf),
    Batch(Vec<PathBuf>),
}

impl ChangePayload {
    pub fn into_paths(self) -> Vec<PathBuf> {
        match self {
            ChangePayload::Single(path) => vec![path],
            ChangePayload::Batch(paths) => paths,
        }
    }
}

impl From<PathBuf> for ChangePayload {
    fn from(path: PathBuf) -> Self {
        ChangePayload::Single(path)
    }
}

impl From<&Path> for ChangePayload {
    fn from(path: &Path) -> Self {
        ChangePayload::Single(path.to_path_buf())
    }
}

impl From<&str> for ChangePayload {
    fn from(path: &str) -> Self {
        ChangePayload::Single(PathBuf::from(path))
    }
}

impl From<Vec<PathBuf>> for ChangePayload {
    fn from(paths: Vec<PathBuf>) -> Self {
        ChangePayload::Batch(paths)
    }
}

/// Outcome of one filter pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterPass {
    /// Number of paths that entered the matcher.
    pub considered: usize,
    pub matched: MatchResult,
}

/// The log line other tools scan for; the count pair is always the last token.
pub fn filter_summary(before: usize, after: usize) -> String {
    format!("changes after filters (before/after): {before}/{after}")
}

/// Upper-case the first character of `path` (`c:\foo` -> `C:\foo`).
///
/// Only an ASCII letter is changed; anything else, including a path that is
/// not valid UTF-8, is returned as is.
pub fn normalize_drive_letter(path: &Path) -> PathBuf {
    let Some(s) = path.to_str() else {
        return path.to_path_buf();
    };
    let mut out = s.to_owned();
    if let Some(first) = out.get_mut(0..1) {
        first.make_ascii_uppercase();
    }
    PathBuf::from(out)
}

/// Flatten a payload into an ordered list of paths, normalized for `style`.
pub fn normalize_payload(payload: ChangePayload, style: PathStyle) -> Vec<PathBuf> {
    let paths = payload.into_paths();
    match style {
        PathStyle::Posix => paths,
        PathStyle::DriveLetter => paths.iter().map(|p| normalize_drive_letter(p)).collect(),
    }
}

/// Normalizes change notifications and runs them through a compiled
/// [`Matcher`].
///
/// Every pass that reaches the matcher advances
/// [`MonitorState::last_started`], whether or not anything matched, so later
/// staleness checks only consider files modified after this pass.
#[derive(Debug, Clone)]
pub struct ChangeFilter {
    matcher: Matcher,
    style: PathStyle,
    cwd: PathBuf,
    state: Arc<MonitorState>,
}

impl ChangeFilter {
    pub fn new(matcher: Matcher, state: Arc<MonitorState>) -> Self {
        Self {
            matcher,
            style: PathStyle::native(),
            cwd: current_dir_or_dot(),
            state,
        }
    }

    /// Compile `rules` and `extensions` and build a filter around them.
    ///
    /// Fails if a rule is not a valid glob; nothing is filtered in that case.
    pub fn from_rules(
        rules: &[String],
        extensions: &[String],
        state: Arc<MonitorState>,
    ) -> Result<Self> {
        Ok(Self::new(Matcher::new(rules, extensions)?, state))
    }

    pub fn with_path_style(mut self, style: PathStyle) -> Self {
        self.style = style;
        self
    }

    /// Directory that logged paths are shown relative to.
    pub fn with_cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = cwd.into();
        self
    }

    /// Run one filter pass.
    ///
    /// Returns `None` when the notification carried no paths; such a
    /// notification is dropped without touching [`MonitorState`].
    pub fn apply(&self, payload: ChangePayload) -> Option<FilterPass> {
        let files = normalize_payload(payload, self.style);
        if files.is_empty() {
            trace!("change notification without paths; dropping");
            return None;
        }

        debug!(
            "files triggering change check: {}",
            join_relative(&self.cwd, &files)
        );

        let matched = self.matcher.filter(&files);

        debug!("{}", filter_summary(files.len(), matched.len()));

        self.state.mark_started();

        Some(FilterPass {
            considered: files.len(),
            matched,
        })
    }
}
