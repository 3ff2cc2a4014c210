// src/watch/matcher.rs

use std::fmt;
use std::path::{Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};

use crate::errors::Result;

/// Output of a match pass.
///
/// `result` keeps the order of the input batch. An empty `result` means the
/// batch contained no relevant change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchResult {
    pub result: Vec<PathBuf>,
    /// Paths rejected by the rules or the extension list.
    pub ignored: usize,
    /// Size of the input batch.
    pub total: usize,
}

impl MatchResult {
    pub fn is_empty(&self) -> bool {
        self.result.is_empty()
    }

    pub fn len(&self) -> usize {
        self.result.len()
    }
}

/// Compiled match rules and extension allow-list.
///
/// Rules are globs. A leading `!` makes a rule an exclude rule. Relative
/// rules match at any depth, and a rule with no glob metacharacters also
/// matches everything beneath it, so `lib` watches the whole `lib` tree.
/// When there are no include rules every path is included.
#[derive(Clone)]
pub struct Matcher {
    include: Option<GlobSet>,
    exclude: Option<GlobSet>,
    extensions: Vec<String>,
}

impl fmt::Debug for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Matcher")
            .field("extensions", &self.extensions)
            .finish_non_exhaustive()
    }
}

impl Matcher {
    pub fn new(rules: &[String], extensions: &[String]) -> Result<Self> {
        let mut include = Vec::new();
        let mut exclude = Vec::new();

        for rule in rules.iter().map(|r| r.trim()).filter(|r| !r.is_empty()) {
            match rule.strip_prefix('!') {
                Some(negated) => exclude.extend(expand_rule(negated)),
                None => include.extend(expand_rule(rule)),
            }
        }

        Ok(Self {
            include: build_optional_globset(&include)?,
            exclude: build_optional_globset(&exclude)?,
            extensions: normalize_extensions(extensions),
        })
    }

    /// Whether a single path passes the rules and the extension list.
    pub fn is_match(&self, path: &Path) -> bool {
        let candidate = path.to_string_lossy().replace('\\', "/");

        if let Some(exclude) = &self.exclude {
            if exclude.is_match(&candidate) {
                return false;
            }
        }
        if let Some(include) = &self.include {
            if !include.is_match(&candidate) {
                return false;
            }
        }
        self.extension_allowed(path)
    }

    /// Filter a batch, preserving its order.
    pub fn filter(&self, paths: &[PathBuf]) -> MatchResult {
        let result: Vec<PathBuf> = paths.iter().filter(|p| self.is_match(p)).cloned().collect();
        MatchResult {
            ignored: paths.len() - result.len(),
            total: paths.len(),
            result,
        }
    }

    fn extension_allowed(&self, path: &Path) -> bool {
        if self.extensions.is_empty() {
            return true;
        }
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) => self.extensions.iter().any(|allowed| allowed.eq_ignore_ascii_case(ext)),
            None => false,
        }
    }
}

/// Filter `paths` against `rules` and `extensions` in one go.
///
/// Fails only when a rule is not a valid glob.
pub fn match_paths(
    paths: &[PathBuf],
    rules: &[String],
    extensions: &[String],
) -> Result<MatchResult> {
    Ok(Matcher::new(rules, extensions)?.filter(paths))
}

fn expand_rule(rule: &str) -> Vec<String> {
    let rule = rule.replace('\\', "/");
    let rule = rule.trim_start_matches("./").trim_end_matches('/');

    let anchored = if is_absolute_rule(rule) || rule.starts_with("**") {
        rule.to_string()
    } else {
        format!("**/{rule}")
    };

    if has_glob_meta(rule) {
        vec![anchored]
    } else {
        vec![anchored.clone(), format!("{anchored}/**")]
    }
}

fn is_absolute_rule(rule: &str) -> bool {
    rule.starts_with('/') || rule.as_bytes().get(1) == Some(&b':')
}

fn has_glob_meta(rule: &str) -> bool {
    rule.contains(['*', '?', '[', '{'])
}

fn normalize_extensions(extensions: &[String]) -> Vec<String> {
    extensions
        .iter()
        .flat_map(|e| e.split(','))
        .map(|e| e.trim().trim_start_matches('.').to_string())
        .filter(|e| !e.is_empty())
        .collect()
}

fn build_optional_globset(patterns: &[String]) -> Result<Option<GlobSet>> {
    if patterns.is_empty() {
        return Ok(None);
    }
    let mut builder = GlobSetBuilder::new();
    for pat in patterns {
        builder.add(Glob::new(pat)?);
    }
    Ok(Some(builder.build()?))
}
