//! Hotspot Error Types
//!
//! Fatal and recoverable error kinds for the hotspot pipeline.

use thiserror::Error;

/// Errors that can occur while computing hotspot scores
#[derive(Debug, Error)]
pub enum HotspotError {
    /// Repository could not be opened or the start reference could not be resolved
    #[error("Repository unavailable at {path}: {reason}\n\nMake sure the path is a git repository and the reference exists.")]
    RepositoryUnavailable { path: String, reason: String },

    /// The window holds too few commits (or no time span) to normalise recency
    #[error("Insufficient history: found {found} commit(s) in the last {lookback_days} day(s); at least 2 commits spanning a non-zero interval are required.\n\nTry a longer window with --lookback.")]
    InsufficientHistory { found: usize, lookback_days: u64 },

    /// A single commit's tree diff failed; the commit is skipped
    #[error("Diff failed for commit {commit}: {reason}")]
    DiffComputation { commit: String, reason: String },

    /// Analysis parameters are unusable
    #[error("Configuration problem: {0}")]
    InvalidConfiguration(String),

    /// Cancellation was observed at a commit boundary
    #[error("Analysis was cancelled")]
    Cancelled,
}

impl HotspotError {
    pub fn repository_unavailable(path: impl Into<String>, reason: impl ToString) -> Self {
        Self::RepositoryUnavailable {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub fn diff(commit: impl Into<String>, reason: impl ToString) -> Self {
        Self::DiffComputation {
            commit: commit.into(),
            reason: reason.to_string(),
        }
    }

    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::InvalidConfiguration(msg.into())
    }

    /// Whether the pipeline must stop with no partial output
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::DiffComputation { .. })
    }
}

/// Result type for hotspot operations
pub type HotspotResult<T> = Result<T, HotspotError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_fatality() {
        assert!(HotspotError::repository_unavailable("/tmp", "nope").is_fatal());
        assert!(HotspotError::InsufficientHistory { found: 1, lookback_days: 180 }.is_fatal());
        assert!(HotspotError::Cancelled.is_fatal());
        assert!(!HotspotError::diff("abc123", "missing tree").is_fatal());
    }

    #[test]
    fn test_error_display() {
        let err = HotspotError::InsufficientHistory { found: 1, lookback_days: 30 };
        let msg = err.to_string();
        assert!(msg.contains("found 1 commit(s)"));
        assert!(msg.contains("30 day(s)"));

        let err = HotspotError::repository_unavailable("/repo", "reference 'main' not found");
        assert!(err.to_string().contains("Repository unavailable at /repo"));
        assert!(err.to_string().contains("reference 'main' not found"));
    }
}
