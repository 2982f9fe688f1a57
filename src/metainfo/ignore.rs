use globset::{GlobBuilder, GlobMatcher};

use super::error::MetainfoError;

/// Wildcard patterns that exclude files and directories by name.
///
/// Each pattern is matched against a single path segment (a basename), never
/// against a full relative path. `*` and `?` never match `/`, and a backslash
/// escapes the following character.
///
/// ```
/// use torrentize::metainfo::IgnoreSet;
///
/// let ignore = IgnoreSet::new(["*.tmp", ".git"]).unwrap();
/// assert!(ignore.is_match("notes.tmp"));
/// assert!(ignore.is_match(".git"));
/// assert!(!ignore.is_match("notes.txt"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct IgnoreSet {
    patterns: Vec<String>,
    matchers: Vec<GlobMatcher>,
}

impl IgnoreSet {
    /// Compiles the patterns in the given order.
    pub fn new<I, S>(patterns: I) -> Result<Self, MetainfoError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set = Self::default();
        for pattern in patterns {
            let pattern = pattern.into();
            let glob = GlobBuilder::new(&pattern)
                .literal_separator(true)
                .backslash_escape(true)
                .build()
                .map_err(|source| MetainfoError::InvalidPattern {
                    pattern: pattern.clone(),
                    source,
                })?;
            set.matchers.push(glob.compile_matcher());
            set.patterns.push(pattern);
        }
        Ok(set)
    }

    /// Returns true if any pattern matches `name`.
    pub fn is_match(&self, name: &str) -> bool {
        self.matchers.iter().any(|m| m.is_match(name))
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }
}
