//! Hotspot scoring engine
//!
//! Scores files by recent change activity. The first pass selects the commits
//! inside the lookback window and materialises their change sets; the second
//! weighs each commit by recency and sums the weights per file.

pub mod accumulator;
pub mod analyzer;
pub mod backend;
pub mod decay;
pub mod error;
pub mod extractor;
pub mod filter;
pub mod model;
pub mod progress;
pub mod ranker;
pub mod window;

pub use accumulator::{HotspotAccumulator, WindowBounds};
pub use analyzer::{AnalysisOptions, HotspotAnalyzer, HotspotReport, DEFAULT_LOOKBACK_DAYS};
pub use backend::{CommitMeta, HistoryBackend, TreeRef};
pub use error::{HotspotError, HotspotResult};
pub use extractor::{CommitChangeExtractor, DiffBaseline, MaterializedHistory};
pub use filter::PathFilter;
pub use model::{ChangeAction, ChangeEntry, CommitRecord, HotspotScore, RankedSpot, SkippedCommit};
pub use progress::{ExtractionProgress, SilentProgress};
pub use ranker::{RankLimit, Ranker, Ranking};
pub use window::{HistoryWindow, HistoryWindowSelector, WindowSpec};
