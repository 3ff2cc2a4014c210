// src/watch/ignore.rs

//! Ignore rules applied inside the watcher callback, before a change ever
//! reaches the change filter.

use std::fmt;
use std::path::{Component, Path};

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};

use crate::errors::Result;

/// Compiled ignore rule for one watch session.
///
/// Two things make a path ignored:
/// - the user's ignore patterns, compiled into one [`GlobSet`];
/// - any dot-prefixed segment below the watched root. Hidden files and
///   directories are always excluded, whatever the configuration says.
///
/// Patterns are globs: `*` and `?` stay within one path segment, `**`
/// spans any number of segments (including none), and `{a,b}` and `[..]`
/// work as usual. Patterns are matched against the path relative to the
/// watched root. A relative pattern may start at any depth, and anything
/// below a matched directory is ignored too, so `node_modules` ignores every
/// `node_modules` tree but not `my_node_modules.js`.
#[derive(Clone, Default)]
pub struct IgnoreRule {
    set: Option<GlobSet>,
    patterns: Vec<String>,
}

impl fmt::Debug for IgnoreRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IgnoreRule")
            .field("patterns", &self.patterns)
            .finish()
    }
}

impl IgnoreRule {
    pub fn from_patterns<S: AsRef<str>>(patterns: &[S]) -> Result<Self> {
        let patterns: Vec<String> = patterns
            .iter()
            .map(|p| p.as_ref().trim())
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .collect();

        if patterns.is_empty() {
            return Ok(Self::default());
        }

        let mut builder = GlobSetBuilder::new();
        for glob in patterns.iter().flat_map(|p| expand_pattern(p)) {
            builder.add(GlobBuilder::new(&glob).literal_separator(true).build()?);
        }

        Ok(Self {
            set: Some(builder.build()?),
            patterns,
        })
    }

    /// User patterns this rule was built from (hidden paths are implicit).
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    /// Whether `path` (reported by a watcher on `root`) should be dropped.
    pub fn is_ignored(&self, root: &Path, path: &Path) -> bool {
        let rel = path.strip_prefix(root).unwrap_or(path);

        if has_hidden_segment(rel) {
            return true;
        }

        match &self.set {
            Some(set) => set.is_match(rel.to_string_lossy().replace('\\', "/")),
            None => false,
        }
    }
}

fn has_hidden_segment(rel: &Path) -> bool {
    rel.components().any(|c| match c {
        Component::Normal(segment) => segment.as_encoded_bytes().first() == Some(&b'.'),
        _ => false,
    })
}

/// `dist` -> `**/dist` and `**/dist/**`.
fn expand_pattern(pattern: &str) -> [String; 2] {
    let pattern = pattern.replace('\\', "/");
    let pattern = pattern.trim_start_matches("./").trim_end_matches('/');
    let pattern = pattern.trim_start_matches('/');

    let anchored = if pattern.starts_with("**") {
        pattern.to_string()
    } else {
        format!("**/{pattern}")
    };
    let below = format!("{anchored}/**");
    [anchored, below]
}
