//! History window selection
//!
//! Picks the commits whose committer time falls inside `[now - lookback, now]`
//! and checks there is enough history to normalise recency against.

use chrono::Duration;
use log::{debug, info};
use super::backend::{CommitMeta, HistoryBackend};
use super::error::{HotspotError, HotspotResult};

/// Parameters describing the window to select
#[derive(Debug, Clone)]
pub struct WindowSpec {
    /// Reference the walk starts from (e.g. `HEAD`, a branch or a sha)
    pub reference: String,
    pub lookback: Duration,
    /// End of the window, seconds since the epoch
    pub now: i64,
}

impl WindowSpec {
    pub fn new(reference: impl Into<String>, lookback: Duration, now: i64) -> Self {
        Self {
            reference: reference.into(),
            lookback,
            now,
        }
    }

    pub fn since(&self) -> i64 {
        self.now - self.lookback.num_seconds()
    }

    pub fn lookback_days(&self) -> u64 {
        self.lookback.num_days().max(0) as u64
    }
}

/// Time-ordered commits of a validated window, newest first
#[derive(Debug, Clone)]
pub struct HistoryWindow {
    now: i64,
    commits: Vec<CommitMeta>,
}

impl HistoryWindow {
    pub fn now(&self) -> i64 {
        self.now
    }

    pub fn commits(&self) -> &[CommitMeta] {
        &self.commits
    }

    pub fn len(&self) -> usize {
        self.commits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commits.is_empty()
    }

    pub fn newest(&self) -> &CommitMeta {
        &self.commits[0]
    }

    pub fn oldest(&self) -> &CommitMeta {
        &self.commits[self.commits.len() - 1]
    }

    /// Seconds between `now` and the oldest commit, always positive
    pub fn span_seconds(&self) -> i64 {
        self.now - self.oldest().timestamp
    }
}

/// Selects and validates the commits to analyse
pub struct HistoryWindowSelector<'b, B: HistoryBackend + ?Sized> {
    backend: &'b B,
}

impl<'b, B: HistoryBackend + ?Sized> HistoryWindowSelector<'b, B> {
    pub fn new(backend: &'b B) -> Self {
        Self { backend }
    }

    pub fn select(&self, spec: &WindowSpec) -> HotspotResult<HistoryWindow> {
        if spec.lookback <= Duration::zero() {
            return Err(HotspotError::configuration("lookback window must be greater than zero"));
        }

        let since = spec.since();
        debug!("Selecting commits from '{}' between {} and {}", spec.reference, since, spec.now);

        let mut commits: Vec<CommitMeta> = self
            .backend
            .commits_between(&spec.reference, since, spec.now)?
            .into_iter()
            .filter(|commit| commit.timestamp >= since && commit.timestamp <= spec.now)
            .collect();
        // stable: equal timestamps keep the backend's traversal order
        commits.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

        let insufficient = HotspotError::InsufficientHistory {
            found: commits.len(),
            lookback_days: spec.lookback_days(),
        };
        if commits.len() < 2 {
            return Err(insufficient);
        }

        let window = HistoryWindow { now: spec.now, commits };
        if window.span_seconds() <= 0 {
            return Err(insufficient);
        }

        info!(
            "Selected {} commits, oldest {} ({}s before now)",
            window.len(),
            window.oldest().id,
            window.span_seconds()
        );
        Ok(window)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hotspot::backend::TreeRef;
    use crate::hotspot::model::ChangeEntry;

    struct FixedHistory(Vec<CommitMeta>);

    impl HistoryBackend for FixedHistory {
        fn commits_between(&self, reference: &str, _since: i64, _until: i64) -> HotspotResult<Vec<CommitMeta>> {
            if reference != "HEAD" {
                return Err(HotspotError::repository_unavailable("memory", format!("unknown reference '{}'", reference)));
            }
            Ok(self.0.clone())
        }

        fn diff_trees(&self, _from: TreeRef<'_>, _to: TreeRef<'_>) -> HotspotResult<Vec<ChangeEntry>> {
            Ok(Vec::new())
        }
    }

    const NOW: i64 = 1_700_000_000;
    const DAY: i64 = 86_400;

    fn spec(days: i64) -> WindowSpec {
        WindowSpec::new("HEAD", Duration::days(days), NOW)
    }

    #[test]
    fn test_window_is_newest_first_and_bounded() {
        let history = FixedHistory(vec![
            CommitMeta::new("old", "too old", NOW - 40 * DAY),
            CommitMeta::new("b", "second", NOW - 10 * DAY),
            CommitMeta::new("a", "first", NOW - DAY),
            CommitMeta::new("future", "clock skew", NOW + DAY),
        ]);
        let window = HistoryWindowSelector::new(&history).select(&spec(30)).unwrap();

        let ids: Vec<_> = window.commits().iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(window.newest().id, "a");
        assert_eq!(window.oldest().id, "b");
        assert_eq!(window.span_seconds(), 10 * DAY);
    }

    #[test]
    fn test_single_commit_is_insufficient() {
        let history = FixedHistory(vec![CommitMeta::new("a", "only", NOW - DAY)]);
        let err = HistoryWindowSelector::new(&history).select(&spec(30)).unwrap_err();
        assert!(matches!(err, HotspotError::InsufficientHistory { found: 1, lookback_days: 30 }));
    }

    #[test]
    fn test_empty_window_is_insufficient() {
        let history = FixedHistory(Vec::new());
        let err = HistoryWindowSelector::new(&history).select(&spec(30)).unwrap_err();
        assert!(matches!(err, HotspotError::InsufficientHistory { found: 0, .. }));
    }

    #[test]
    fn test_zero_span_is_insufficient() {
        let history = FixedHistory(vec![
            CommitMeta::new("a", "one", NOW),
            CommitMeta::new("b", "two", NOW),
        ]);
        let err = HistoryWindowSelector::new(&history).select(&spec(30)).unwrap_err();
        assert!(matches!(err, HotspotError::InsufficientHistory { found: 2, .. }));
    }

    #[test]
    fn test_unknown_reference_is_unavailable() {
        let history = FixedHistory(Vec::new());
        let spec = WindowSpec::new("missing", Duration::days(30), NOW);
        let err = HistoryWindowSelector::new(&history).select(&spec).unwrap_err();
        assert!(matches!(err, HotspotError::RepositoryUnavailable { .. }));
    }

    #[test]
    fn test_zero_lookback_is_rejected() {
        let history = FixedHistory(Vec::new());
        let err = HistoryWindowSelector::new(&history).select(&spec(0)).unwrap_err();
        assert!(matches!(err, HotspotError::InvalidConfiguration(_)));
    }
}
