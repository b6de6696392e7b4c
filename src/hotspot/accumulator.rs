//! Hotspot score accumulation
//!
//! Second pass of the pipeline. Each commit's decay weight is computed once
//! and added, in full, to every file the commit touched.

use std::collections::HashMap;
use log::trace;
use super::decay;
use super::model::{CommitRecord, HotspotScore};

/// Window bounds the decay weight is normalised against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowBounds {
    pub now: i64,
    pub oldest: i64,
}

impl WindowBounds {
    pub fn new(now: i64, oldest: i64) -> Self {
        Self { now, oldest }
    }

    pub fn weight(&self, commit_time: i64) -> f64 {
        decay::weight(commit_time, self.now, self.oldest)
    }
}

/// Owns the path → score mapping for one run
#[derive(Debug, Clone)]
pub struct HotspotAccumulator {
    bounds: WindowBounds,
    scores: HashMap<String, HotspotScore>,
}

impl HotspotAccumulator {
    pub fn new(bounds: WindowBounds) -> Self {
        Self {
            bounds,
            scores: HashMap::new(),
        }
    }

    /// Fold one commit in, returning the weight it contributed per file
    pub fn add_commit(&mut self, record: &CommitRecord) -> f64 {
        let weight = self.bounds.weight(record.timestamp);
        for path in record.scoring_paths() {
            let entry = self.scores.entry(path.to_string()).or_default();
            entry.score += weight;
            entry.touches += 1;
        }
        trace!("Commit {} weight {:.6}", record.id, weight);
        weight
    }

    pub fn add_all<'a>(&mut self, records: impl IntoIterator<Item = &'a CommitRecord>) {
        for record in records {
            self.add_commit(record);
        }
    }

    /// Sum another partial accumulation into this one
    pub fn merge(&mut self, other: HotspotAccumulator) {
        for (path, partial) in other.scores {
            let entry = self.scores.entry(path).or_default();
            entry.score += partial.score;
            entry.touches += partial.touches;
        }
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn score(&self, path: &str) -> Option<f64> {
        self.scores.get(path).map(|s| s.score)
    }

    pub fn scores(&self) -> &HashMap<String, HotspotScore> {
        &self.scores
    }

    pub fn into_scores(self) -> HashMap<String, HotspotScore> {
        self.scores
    }
}
