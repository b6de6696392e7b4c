//! Commit Change Extraction
//!
//! First pass of the pipeline: every commit in the window is diffed against
//! its baseline and materialised as a [`CommitRecord`].
//!
//! With [`DiffBaseline::NewestSnapshot`] each commit's tree is compared with
//! the tree of the newest commit in the window, so a record describes the
//! drift between that commit and the newest state rather than what the commit
//! itself introduced. [`DiffBaseline::PreviousCommit`] gives the incremental
//! per-commit diff instead.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use log::{debug, info, warn};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use super::backend::{CommitMeta, HistoryBackend, TreeRef};
use super::error::{HotspotError, HotspotResult};
use super::filter::PathFilter;
use super::model::{ChangeEntry, CommitRecord, SkippedCommit};
use super::progress::{ExtractionProgress, SilentProgress};
use super::window::HistoryWindow;

/// Tree each commit is compared against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiffBaseline {
    /// The newest commit in the window, fixed for the whole walk
    #[default]
    NewestSnapshot,
    /// The commit's first parent
    PreviousCommit,
}

impl FromStr for DiffBaseline {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "newest" | "newest-snapshot" | "snapshot" => Ok(DiffBaseline::NewestSnapshot),
            "previous" | "previous-commit" | "parent" => Ok(DiffBaseline::PreviousCommit),
            _ => Err(format!("Invalid diff baseline: {}. Valid options: newest, previous", s)),
        }
    }
}

impl fmt::Display for DiffBaseline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiffBaseline::NewestSnapshot => write!(f, "newest"),
            DiffBaseline::PreviousCommit => write!(f, "previous"),
        }
    }
}

/// Output of the first pass
#[derive(Debug, Clone, Default)]
pub struct MaterializedHistory {
    /// One record per window commit, in window order
    pub records: Vec<CommitRecord>,
    /// Commits whose diff failed; their records carry no entries
    pub skipped: Vec<SkippedCommit>,
}

/// Turns window commits into normalised change sets
pub struct CommitChangeExtractor<'b, B: HistoryBackend + ?Sized> {
    backend: &'b B,
    baseline: DiffBaseline,
    filter: PathFilter,
    progress: Arc<dyn ExtractionProgress>,
}

impl<'b, B: HistoryBackend + ?Sized> CommitChangeExtractor<'b, B> {
    pub fn new(backend: &'b B, baseline: DiffBaseline) -> Self {
        Self {
            backend,
            baseline,
            filter: PathFilter::default(),
            progress: Arc::new(SilentProgress),
        }
    }

    pub fn with_filter(mut self, filter: PathFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_progress(mut self, progress: Arc<dyn ExtractionProgress>) -> Self {
        self.progress = progress;
        self
    }

    /// Change entries for one commit relative to the configured baseline
    pub fn extract(&self, commit: &CommitMeta, newest: &CommitMeta) -> HotspotResult<Vec<ChangeEntry>> {
        let entries = match self.baseline {
            DiffBaseline::NewestSnapshot => {
                if commit.id == newest.id {
                    // identical trees
                    Vec::new()
                } else {
                    self.backend
                        .diff_trees(TreeRef::Commit(&commit.id), TreeRef::Commit(&newest.id))?
                }
            }
            DiffBaseline::PreviousCommit => self
                .backend
                .diff_trees(TreeRef::ParentOf(&commit.id), TreeRef::Commit(&commit.id))?,
        };

        if self.filter.is_empty() {
            return Ok(entries);
        }
        Ok(entries
            .into_iter()
            .filter(|entry| self.filter.allows_entry(entry))
            .collect())
    }

    /// Materialise the whole window
    ///
    /// `threads == 1` walks sequentially, `0` uses the global rayon pool and
    /// any other value a dedicated pool of that size. Results always come back
    /// in window order.
    pub fn materialize(
        &self,
        window: &HistoryWindow,
        threads: usize,
        cancel: &CancellationToken,
    ) -> HotspotResult<MaterializedHistory> {
        let newest = window.newest();
        info!(
            "Extracting changes for {} commits (baseline: {}, threads: {})",
            window.len(),
            self.baseline,
            threads
        );

        self.progress.started(window.len());
        let outcomes: Vec<HotspotResult<Vec<ChangeEntry>>> = match threads {
            1 => {
                let mut outcomes = Vec::with_capacity(window.len());
                for commit in window.commits() {
                    outcomes.push(self.extract_checked(commit, newest, cancel));
                }
                outcomes
            }
            0 => self.extract_parallel(window, cancel),
            n => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(n)
                    .build()
                    .map_err(|e| HotspotError::configuration(format!("Failed to build worker pool: {}", e)))?;
                pool.install(|| self.extract_parallel(window, cancel))
            }
        };
        self.progress.finished();

        let mut history = MaterializedHistory::default();
        for (commit, outcome) in window.commits().iter().zip(outcomes) {
            let changes = match outcome {
                Ok(changes) => changes,
                Err(HotspotError::DiffComputation { reason, .. }) => {
                    warn!("Skipping commit {}: {}", commit.id, reason);
                    history.skipped.push(SkippedCommit { id: commit.id.clone(), reason });
                    Vec::new()
                }
                Err(fatal) => return Err(fatal),
            };
            debug!("Commit {} '{}': {} change(s)", commit.id, commit.summary, changes.len());
            history.records.push(CommitRecord::new(
                commit.id.clone(),
                commit.summary.clone(),
                commit.timestamp,
                changes,
            ));
        }

        Ok(history)
    }

    fn extract_parallel(
        &self,
        window: &HistoryWindow,
        cancel: &CancellationToken,
    ) -> Vec<HotspotResult<Vec<ChangeEntry>>> {
        let newest = window.newest();
        window
            .commits()
            .par_iter()
            .map(|commit| self.extract_checked(commit, newest, cancel))
            .collect()
    }

    fn extract_checked(
        &self,
        commit: &CommitMeta,
        newest: &CommitMeta,
        cancel: &CancellationToken,
    ) -> HotspotResult<Vec<ChangeEntry>> {
        if cancel.is_cancelled() {
            return Err(HotspotError::Cancelled);
        }
        let outcome = self.extract(commit, newest);
        self.progress.commit_done(&commit.id);
        outcome
    }
}
