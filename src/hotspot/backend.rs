//! History Backend Contract
//!
//! The pipeline talks to version control only through [`HistoryBackend`]:
//! a time-bounded commit stream and a tree-diff operation. The git2
//! implementation lives in [`crate::git`].

use serde::{Deserialize, Serialize};
use super::error::HotspotResult;
use super::model::ChangeEntry;

/// Commit metadata returned by the commit stream
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitMeta {
    pub id: String,
    /// First line of the commit message
    pub summary: String,
    /// Committer time, seconds since the epoch
    pub timestamp: i64,
}

impl CommitMeta {
    pub fn new(id: impl Into<String>, summary: impl Into<String>, timestamp: i64) -> Self {
        Self {
            id: id.into(),
            summary: summary.into(),
            timestamp,
        }
    }
}

/// One side of a tree diff
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeRef<'a> {
    /// The tree of the given commit
    Commit(&'a str),
    /// The tree of the given commit's first parent (empty for a root commit)
    ParentOf(&'a str),
}

/// Read-only access to a repository's history
///
/// Implementations must be shareable across worker threads; diffs against a
/// fixed baseline are computed concurrently.
pub trait HistoryBackend: Sync {
    /// Commits reachable from `reference` whose committer time lies in
    /// `[since, until]`, newest first.
    ///
    /// Fails with `RepositoryUnavailable` if the reference cannot be resolved.
    fn commits_between(&self, reference: &str, since: i64, until: i64) -> HotspotResult<Vec<CommitMeta>>;

    /// Path-level changes going from the `from` tree to the `to` tree.
    ///
    /// Fails with `DiffComputation` when either tree cannot be loaded or diffed.
    fn diff_trees(&self, from: TreeRef<'_>, to: TreeRef<'_>) -> HotspotResult<Vec<ChangeEntry>>;
}
