//! Hotspot Analysis Pipeline
//!
//! Drives the two passes: window selection and change extraction first, then
//! decay weighting, accumulation and ranking once the window bounds are known.

use std::sync::Arc;
use chrono::{DateTime, Duration, TimeZone, Utc};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use super::accumulator::{HotspotAccumulator, WindowBounds};
use super::backend::HistoryBackend;
use super::error::{HotspotError, HotspotResult};
use super::extractor::{CommitChangeExtractor, DiffBaseline};
use super::filter::PathFilter;
use super::model::{RankedSpot, SkippedCommit};
use super::progress::{ExtractionProgress, SilentProgress};
use super::ranker::{RankLimit, Ranker};
use super::window::{HistoryWindowSelector, WindowSpec};

/// Default lookback: six months
pub const DEFAULT_LOOKBACK_DAYS: i64 = 180;

/// Parameters for one analysis run
#[derive(Debug, Clone)]
pub struct AnalysisOptions {
    pub reference: String,
    pub lookback: Duration,
    pub baseline: DiffBaseline,
    pub limit: RankLimit,
    /// Worker threads for change extraction; 0 = rayon default, 1 = sequential
    pub threads: usize,
    pub filter: PathFilter,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            reference: "HEAD".to_string(),
            lookback: Duration::days(DEFAULT_LOOKBACK_DAYS),
            baseline: DiffBaseline::default(),
            limit: RankLimit::default(),
            threads: 0,
            filter: PathFilter::default(),
        }
    }
}

/// Result of a successful run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HotspotReport {
    pub now: DateTime<Utc>,
    pub oldest_commit: DateTime<Utc>,
    pub lookback_days: u64,
    pub baseline: DiffBaseline,
    pub commits_analyzed: usize,
    pub skipped: Vec<SkippedCommit>,
    /// Distinct scored files before the limit was applied
    pub total_files: usize,
    pub spots: Vec<RankedSpot>,
}

impl HotspotReport {
    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }
}

/// Runs the hotspot pipeline against a history backend
pub struct HotspotAnalyzer<'b, B: HistoryBackend + ?Sized> {
    backend: &'b B,
    options: AnalysisOptions,
    cancel: CancellationToken,
    progress: Arc<dyn ExtractionProgress>,
}

impl<'b, B: HistoryBackend + ?Sized> HotspotAnalyzer<'b, B> {
    pub fn new(backend: &'b B, options: AnalysisOptions) -> Self {
        Self {
            backend,
            options,
            cancel: CancellationToken::new(),
            progress: Arc::new(SilentProgress),
        }
    }

    /// Use an externally owned token so callers can abort between commits
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Report first-pass progress to `progress`
    pub fn with_progress(mut self, progress: Arc<dyn ExtractionProgress>) -> Self {
        self.progress = progress;
        self
    }

    /// Analyse the window ending at the current time
    pub fn analyze(&self) -> HotspotResult<HotspotReport> {
        self.analyze_at(Utc::now().timestamp())
    }

    /// Analyse the window ending at `now` (seconds since the epoch)
    pub fn analyze_at(&self, now: i64) -> HotspotResult<HotspotReport> {
        let spec = WindowSpec::new(self.options.reference.clone(), self.options.lookback, now);

        // Phase 1: select and materialise
        let window = HistoryWindowSelector::new(self.backend).select(&spec)?;
        let extractor = CommitChangeExtractor::new(self.backend, self.options.baseline)
            .with_filter(self.options.filter.clone())
            .with_progress(Arc::clone(&self.progress));
        let history = extractor.materialize(&window, self.options.threads, &self.cancel)?;

        if !history.skipped.is_empty() {
            info!(
                "Skipped {} of {} commits after diff failures",
                history.skipped.len(),
                history.records.len()
            );
        }

        // Phase 2: weigh and accumulate against the known bounds
        let bounds = WindowBounds::new(window.now(), window.oldest().timestamp);
        let mut accumulator = HotspotAccumulator::new(bounds);
        for record in &history.records {
            if self.cancel.is_cancelled() {
                return Err(HotspotError::Cancelled);
            }
            accumulator.add_commit(record);
        }
        debug!("Accumulated scores for {} files", accumulator.len());

        let ranking = Ranker::rank(accumulator.into_scores(), self.options.limit);
        info!(
            "Ranked {} of {} files from {} commits",
            ranking.limited().len(),
            ranking.total_files(),
            history.records.len()
        );

        Ok(HotspotReport {
            now: timestamp_to_utc(bounds.now),
            oldest_commit: timestamp_to_utc(bounds.oldest),
            lookback_days: spec.lookback_days(),
            baseline: self.options.baseline,
            commits_analyzed: history.records.len(),
            skipped: history.skipped,
            total_files: ranking.total_files(),
            spots: ranking.into_limited(),
        })
    }
}

fn timestamp_to_utc(seconds: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(seconds, 0)
        .single()
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}
