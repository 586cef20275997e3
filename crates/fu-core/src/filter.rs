//! Include/exclude path filtering for bucket discovery.
//!
//! Patterns come in two shapes:
//! - `migrations/core` - a path prefix, compared component by component
//! - `migrations/*/core` - a glob (any pattern containing `*`, `?` or `[`)
//!
//! A pattern matches a candidate when it matches the candidate path or any
//! of its ancestors. Relative patterns are also tried against the candidate
//! path relative to the root it was found under and, when set, relative to
//! the filter's base directory (the project directory for the CLI).

use crate::error::{CoreError, CoreResult};
use glob::{MatchOptions, Pattern};
use std::path::{Path, PathBuf};

const GLOB_MATCH: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// A single include or exclude pattern.
#[derive(Debug, Clone)]
pub enum PathPattern {
    /// Component-wise path prefix
    Prefix(PathBuf),
    /// Glob pattern
    Glob(Pattern),
}

impl PathPattern {
    /// Parse a pattern string.
    pub fn parse(pattern: &str) -> CoreResult<Self> {
        let trimmed = pattern.trim();
        if trimmed.is_empty() {
            return Err(CoreError::InvalidPattern {
                pattern: pattern.to_string(),
                reason: "pattern is empty".to_string(),
            });
        }

        if trimmed.contains(['*', '?', '[']) {
            let glob = Pattern::new(trimmed).map_err(|e| CoreError::InvalidPattern {
                pattern: pattern.to_string(),
                reason: e.to_string(),
            })?;
            return Ok(PathPattern::Glob(glob));
        }

        Ok(PathPattern::Prefix(PathBuf::from(trimmed)))
    }

    fn is_relative(&self) -> bool {
        match self {
            PathPattern::Prefix(prefix) => prefix.is_relative(),
            PathPattern::Glob(glob) => !glob.as_str().starts_with('/'),
        }
    }

    /// Whether `path` (or one of its ancestors) matches.
    pub fn matches(&self, path: &Path) -> bool {
        match self {
            PathPattern::Prefix(prefix) => path.starts_with(prefix),
            PathPattern::Glob(glob) => path
                .ancestors()
                .filter(|a| !a.as_os_str().is_empty())
                .any(|a| glob.matches_path_with(a, GLOB_MATCH)),
        }
    }

    fn matches_candidate(&self, path: &Path, anchors: &[&Path]) -> bool {
        if self.matches(path) {
            return true;
        }
        if !self.is_relative() {
            return false;
        }
        anchors.iter().any(|anchor| match path.strip_prefix(anchor) {
            Ok(relative) if !relative.as_os_str().is_empty() => self.matches(relative),
            _ => false,
        })
    }
}

/// Include/exclude filter applied to every discovered candidate.
///
/// A candidate is kept iff the include list is empty or some include
/// pattern matches, and no exclude pattern matches. Exclude always wins.
#[derive(Debug, Clone, Default)]
pub struct PathFilter {
    include: Vec<PathPattern>,
    exclude: Vec<PathPattern>,
    base: Option<PathBuf>,
}

impl PathFilter {
    /// Build a filter from raw pattern strings.
    pub fn new<S: AsRef<str>>(include: &[S], exclude: &[S]) -> CoreResult<Self> {
        let parse_all = |patterns: &[S]| {
            patterns
                .iter()
                .map(|p| PathPattern::parse(p.as_ref()))
                .collect::<CoreResult<Vec<_>>>()
        };
        Ok(Self {
            include: parse_all(include)?,
            exclude: parse_all(exclude)?,
            base: None,
        })
    }

    /// Also resolve relative patterns against `base`.
    pub fn relative_to(mut self, base: impl Into<PathBuf>) -> Self {
        self.base = Some(base.into());
        self
    }

    /// Filter that keeps everything.
    pub fn allow_all() -> Self {
        Self::default()
    }

    /// Decide whether `path`, found under `root`, is kept.
    pub fn accepts(&self, path: &Path, root: &Path) -> bool {
        let mut anchors = vec![root];
        anchors.extend(self.base.as_deref());

        let included = self.include.is_empty()
            || self
                .include
                .iter()
                .any(|p| p.matches_candidate(path, &anchors));
        if !included {
            return false;
        }
        !self
            .exclude
            .iter()
            .any(|p| p.matches_candidate(path, &anchors))
    }
}

#[cfg(test)]
#[path = "filter_test.rs"]
mod tests;
