/*!
 * Inclusion filters applied to every tree node before it is rendered
 */

use std::path::Path;

use glob_match::glob_match;

/// Decides whether a node (and, for directories, its whole subtree) is rendered
pub trait EntryFilter {
    /// `full_path` is the pack root joined with every ancestor and `name`
    fn accept(&self, full_path: &Path, name: &str, is_dir: bool) -> bool;
}

impl<F> EntryFilter for F
where
    F: Fn(&Path, &str, bool) -> bool,
{
    fn accept(&self, full_path: &Path, name: &str, is_dir: bool) -> bool {
        self(full_path, name, is_dir)
    }
}

/// Accepts every node
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAll;

impl EntryFilter for AcceptAll {
    fn accept(&self, _full_path: &Path, _name: &str, _is_dir: bool) -> bool {
        true
    }
}

/// Glob based filter built from `--exclude` / `--include` patterns
#[derive(Debug, Clone, Default)]
pub struct PatternFilter {
    /// Patterns to reject; matched against the name and the full path
    pub exclude_patterns: Vec<String>,
    /// If non-empty, only files matching one of these are kept
    pub include_patterns: Vec<String>,
}

impl PatternFilter {
    pub fn new(exclude_patterns: Vec<String>, include_patterns: Vec<String>) -> Self {
        Self {
            exclude_patterns,
            include_patterns,
        }
    }

    /// Check if a node matches any exclude pattern
    pub fn should_ignore(&self, full_path: &Path, name: &str) -> bool {
        let path = full_path.to_string_lossy();
        self.exclude_patterns
            .iter()
            .any(|pattern| glob_match(pattern, name) || glob_match(pattern, &path))
    }

    /// Check if a file is admitted by the include patterns
    pub fn should_include(&self, full_path: &Path, name: &str) -> bool {
        if self.include_patterns.is_empty() {
            return true;
        }
        let path = full_path.to_string_lossy();
        self.include_patterns
            .iter()
            .any(|pattern| glob_match(pattern, name) || glob_match(pattern, &path))
    }
}

impl EntryFilter for PatternFilter {
    fn accept(&self, full_path: &Path, name: &str, is_dir: bool) -> bool {
        if self.should_ignore(full_path, name) {
            return false;
        }
        // Directories are kept so files below them can still match
        is_dir || self.should_include(full_path, name)
    }
}
