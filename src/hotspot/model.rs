//! Normalised data structures shared by the hotspot pipeline

use serde::{Deserialize, Serialize};

/// Kind of path-level change reported by a tree diff
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChangeAction {
    Add,
    Modify,
    Delete,
    Rename,
}

/// One file-level difference between a commit and its baseline
///
/// At least one of `from_path` / `to_path` is always present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawChangeEntry")]
pub struct ChangeEntry {
    action: ChangeAction,
    from_path: Option<String>,
    to_path: Option<String>,
}

/// Unchecked wire form of [`ChangeEntry`]
#[derive(Deserialize)]
struct RawChangeEntry {
    action: ChangeAction,
    from_path: Option<String>,
    to_path: Option<String>,
}

impl TryFrom<RawChangeEntry> for ChangeEntry {
    type Error = String;

    fn try_from(raw: RawChangeEntry) -> Result<Self, Self::Error> {
        ChangeEntry::new(raw.action, raw.from_path, raw.to_path)
            .ok_or_else(|| "change entry needs a from_path or a to_path".to_string())
    }
}

impl ChangeEntry {
    /// Build an entry, rejecting one with neither path
    pub fn new(action: ChangeAction, from_path: Option<String>, to_path: Option<String>) -> Option<Self> {
        if from_path.is_none() && to_path.is_none() {
            return None;
        }
        Some(Self { action, from_path, to_path })
    }

    pub fn added(path: impl Into<String>) -> Self {
        Self { action: ChangeAction::Add, from_path: None, to_path: Some(path.into()) }
    }

    pub fn modified(path: impl Into<String>) -> Self {
        let path = path.into();
        Self { action: ChangeAction::Modify, from_path: Some(path.clone()), to_path: Some(path) }
    }

    pub fn deleted(path: impl Into<String>) -> Self {
        Self { action: ChangeAction::Delete, from_path: Some(path.into()), to_path: None }
    }

    pub fn renamed(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self { action: ChangeAction::Rename, from_path: Some(from.into()), to_path: Some(to.into()) }
    }

    pub fn action(&self) -> ChangeAction {
        self.action
    }

    pub fn from_path(&self) -> Option<&str> {
        self.from_path.as_deref()
    }

    pub fn to_path(&self) -> Option<&str> {
        self.to_path.as_deref()
    }

    /// Path the entry is scored under: the "from" name when present, else the "to" name.
    /// Deletions never score.
    pub fn scoring_path(&self) -> Option<&str> {
        if self.action == ChangeAction::Delete {
            return None;
        }
        self.from_path().or_else(|| self.to_path())
    }
}

/// A commit materialised during the first pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommitRecord {
    pub id: String,
    /// First line of the commit message
    pub summary: String,
    /// Committer time, seconds since the epoch
    pub timestamp: i64,
    pub changes: Vec<ChangeEntry>,
}

impl CommitRecord {
    pub fn new(id: impl Into<String>, summary: impl Into<String>, timestamp: i64, changes: Vec<ChangeEntry>) -> Self {
        Self {
            id: id.into(),
            summary: summary.into(),
            timestamp,
            changes,
        }
    }

    /// Entries that contribute to a file's score
    pub fn scoring_paths(&self) -> impl Iterator<Item = &str> {
        self.changes.iter().filter_map(ChangeEntry::scoring_path)
    }
}

/// Running total for one file path
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HotspotScore {
    pub score: f64,
    /// Number of change entries that contributed
    pub touches: u32,
}

/// Immutable ranked result for presentation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedSpot {
    pub path: String,
    pub score: f64,
    pub touches: u32,
}

/// Commit excluded from scoring because its diff failed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedCommit {
    pub id: String,
    pub reason: String,
}

/// First line of a commit message, trimmed
pub fn summary_line(message: &str) -> String {
    message.lines().next().unwrap_or("").trim().to_string()
}
