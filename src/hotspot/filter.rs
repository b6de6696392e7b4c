//! Path filtering for scored entries

use serde::{Deserialize, Serialize};
use super::model::ChangeEntry;

/// Prefix-based include/exclude filter on repository-relative paths
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PathFilter {
    /// Path prefixes to include (empty means include all)
    pub include: Vec<String>,
    /// Path prefixes to exclude
    pub exclude: Vec<String>,
}

impl PathFilter {
    pub fn new(include: Vec<String>, exclude: Vec<String>) -> Self {
        Self { include, exclude }
    }

    pub fn is_empty(&self) -> bool {
        self.include.is_empty() && self.exclude.is_empty()
    }

    /// Check a single path against the include and exclude prefixes
    pub fn allows(&self, path: &str) -> bool {
        let included = self.include.is_empty()
            || self.include.iter().any(|prefix| path.starts_with(prefix.as_str()));
        let excluded = self.exclude.iter().any(|prefix| path.starts_with(prefix.as_str()));
        included && !excluded
    }

    /// Check an entry by the path it would be scored (or, for deletions, reported) under
    pub fn allows_entry(&self, entry: &ChangeEntry) -> bool {
        match entry.from_path().or_else(|| entry.to_path()) {
            Some(path) => self.allows(path),
            None => false,
        }
    }
}
