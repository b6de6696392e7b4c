//! Ranking of accumulated scores

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use serde::{Deserialize, Serialize};
use super::model::{HotspotScore, RankedSpot};

/// How many ranked entries to keep
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RankLimit {
    All,
    /// At most `n` entries
    Top(usize),
}

impl Default for RankLimit {
    fn default() -> Self {
        RankLimit::Top(100)
    }
}

impl RankLimit {
    /// `0` means no limit
    pub fn from_count(count: usize) -> Self {
        if count == 0 {
            RankLimit::All
        } else {
            RankLimit::Top(count)
        }
    }

    fn apply(&self, total: usize) -> usize {
        match self {
            RankLimit::All => total,
            RankLimit::Top(n) => (*n).min(total),
        }
    }
}

impl FromStr for RankLimit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("all") {
            return Ok(RankLimit::All);
        }
        trimmed
            .parse::<usize>()
            .map(RankLimit::from_count)
            .map_err(|_| format!("Invalid limit: {}. Expected a number or 'all'", s))
    }
}

impl fmt::Display for RankLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RankLimit::All => write!(f, "all"),
            RankLimit::Top(n) => write!(f, "{}", n),
        }
    }
}

/// Every scored file, highest score first, with the limit to present
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ranking {
    spots: Vec<RankedSpot>,
    limit: RankLimit,
}

impl Ranking {
    /// The full ranked sequence
    pub fn spots(&self) -> &[RankedSpot] {
        &self.spots
    }

    /// Distinct scored files, independent of the limit
    pub fn total_files(&self) -> usize {
        self.spots.len()
    }

    /// View of the first `n` entries
    pub fn top(&self, n: usize) -> &[RankedSpot] {
        &self.spots[..n.min(self.spots.len())]
    }

    /// View of the entries kept by the configured limit
    pub fn limited(&self) -> &[RankedSpot] {
        self.top(self.limit.apply(self.spots.len()))
    }

    /// Consume the ranking, keeping only the limited entries
    pub fn into_limited(mut self) -> Vec<RankedSpot> {
        let kept = self.limit.apply(self.spots.len());
        self.spots.truncate(kept);
        self.spots
    }
}

/// Sorts a score mapping into a [`Ranking`]
pub struct Ranker;

impl Ranker {
    /// Descending by score, ties broken by ascending path
    pub fn rank(scores: HashMap<String, HotspotScore>, limit: RankLimit) -> Ranking {
        let mut spots: Vec<RankedSpot> = scores
            .into_iter()
            .map(|(path, score)| RankedSpot {
                path,
                score: score.score,
                touches: score.touches,
            })
            .collect();

        spots.sort_by(Self::compare);

        Ranking { spots, limit }
    }

    fn compare(a: &RankedSpot, b: &RankedSpot) -> Ordering {
        b.score
            .total_cmp(&a.score)
            .then_with(|| a.path.cmp(&b.path))
    }
}
