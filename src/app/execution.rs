//! Application execution: open the repository, run the analysis, print the report

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use log::{debug, info, warn};
use tokio_util::sync::CancellationToken;

use crate::display;
use crate::git::GitHistory;
use crate::hotspot::{
    AnalysisOptions, ExtractionProgress, HotspotAnalyzer, HotspotReport, HotspotResult, SilentProgress,
};
use super::initialization::RunSettings;

/// Run the hotspot pipeline against the repository at `repo_path`
pub fn analyze_repository(
    repo_path: &Path,
    options: AnalysisOptions,
    cancel: CancellationToken,
    progress: Arc<dyn ExtractionProgress>,
) -> HotspotResult<HotspotReport> {
    let history = GitHistory::open(repo_path)?;
    HotspotAnalyzer::new(&history, options)
        .with_cancellation(cancel)
        .with_progress(progress)
        .analyze()
}

/// Analyse on the blocking pool, cancelling at the next commit boundary on Ctrl-C
pub async fn run_analysis(
    repo_path: PathBuf,
    settings: RunSettings,
    colour_manager: display::ColourManager,
) -> Result<()> {
    let RunSettings { options, format, show_progress } = settings;
    let cancel = CancellationToken::new();
    let worker_cancel = cancel.clone();
    let progress: Arc<dyn ExtractionProgress> = if show_progress {
        Arc::new(display::ProgressIndicator::new(colour_manager.clone()))
    } else {
        Arc::new(SilentProgress)
    };

    debug!("Starting hotspot analysis of {}", repo_path.display());
    let mut task = tokio::task::spawn_blocking(move || {
        analyze_repository(&repo_path, options, worker_cancel, progress)
    });

    let joined = tokio::select! {
        joined = &mut task => joined,
        _ = tokio::signal::ctrl_c() => {
            warn!("Interrupt received, stopping at the next commit boundary");
            cancel.cancel();
            task.await
        }
    };

    let report = joined.context("Hotspot analysis task failed")??;
    info!(
        "Analysis complete: {} hotspots reported of {} files",
        report.spots.len(),
        report.total_files
    );

    let output = display::render_report(&report, format, &colour_manager)?;
    match format {
        display::ReportFormat::Text => print!("{}", output),
        display::ReportFormat::Json => println!("{}", output),
    }

    Ok(())
}
