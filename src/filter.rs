//! Include/exclude filtering of root-relative paths.
//!
//! Patterns are shell-style globs (`*`, `?`, `[...]`). A `*` never crosses a
//! `/`, so a pattern is tried twice: once against the whole slash-separated
//! relative path and once against the bare file name. That lets `*.go`
//! match `cmd/app/main.go` without a `**/` prefix.
//!
//! globset's extended syntax is switched off by [`plain_glob`]: braces are
//! literal and a run of stars is a single star.

use crate::error::{Error, Result};
use globset::{GlobBuilder, GlobMatcher};

/// Compiled list of glob patterns.
#[derive(Debug, Clone, Default)]
pub(crate) struct PatternSet {
    matchers: Vec<GlobMatcher>,
}

impl PatternSet {
    /// Compiles every pattern, failing on the first invalid one.
    pub(crate) fn new(patterns: &[String]) -> Result<Self> {
        let matchers = patterns
            .iter()
            .map(|pattern| {
                GlobBuilder::new(&plain_glob(pattern))
                    .literal_separator(true)
                    .backslash_escape(true)
                    .build()
                    .map(|glob| glob.compile_matcher())
                    .map_err(|e| Error::invalid_pattern(pattern, e.kind().to_string()))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { matchers })
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.matchers.is_empty()
    }

    /// Returns true if `rel` or its file name matches any pattern.
    ///
    /// An empty set matches nothing.
    pub(crate) fn matches_any(&self, rel: &str) -> bool {
        let base = rel.rsplit('/').next().unwrap_or(rel);
        self.matchers
            .iter()
            .any(|m| m.is_match(rel) || m.is_match(base))
    }
}

/// Rewrites `pattern` so globset only sees `*`, `?` and `[...]`.
///
/// Outside a class `{` and `}` become `[{]` and `[}]`, and consecutive
/// stars collapse to one. Escapes and class contents are copied as is.
fn plain_glob(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len());
    let mut chars = pattern.chars().peekable();
    let mut in_class = false;

    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                out.push(c);
                if let Some(next) = chars.next() {
                    out.push(next);
                }
            }
            _ if in_class => {
                out.push(c);
                if c == ']' {
                    in_class = false;
                }
            }
            '[' => {
                out.push(c);
                in_class = true;
                if let Some(&neg @ ('!' | '^')) = chars.peek() {
                    out.push(neg);
                    chars.next();
                }
                // a leading `]` is a member, not the end of the class
                if chars.peek() == Some(&']') {
                    out.push(']');
                    chars.next();
                }
            }
            '{' => out.push_str("[{]"),
            '}' => out.push_str("[}]"),
            '*' => {
                out.push('*');
                while chars.peek() == Some(&'*') {
                    chars.next();
                }
            }
            _ => out.push(c),
        }
    }

    out
}

/// Include/exclude decision for paths relative to the root.
#[derive(Debug, Clone, Default)]
pub(crate) struct FileFilter {
    includes: PatternSet,
    excludes: PatternSet,
}

impl FileFilter {
    /// Builds a filter from raw include and exclude patterns.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPattern`] if any pattern fails to compile.
    pub(crate) fn new(includes: &[String], excludes: &[String]) -> Result<Self> {
        Ok(Self {
            includes: PatternSet::new(includes)?,
            excludes: PatternSet::new(excludes)?,
        })
    }

    /// Exclusion wins over inclusion; no includes means "keep everything".
    pub(crate) fn should_keep(&self, rel: &str) -> bool {
        if self.excludes.matches_any(rel) {
            return false;
        }
        self.includes.is_empty() || self.includes.matches_any(rel)
    }
}
