//! Hotspot report rendering
//!
//! Rendering is pure: the same report always produces the same string.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::colours::ColourManager;
use crate::hotspot::HotspotReport;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

/// Report output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" => Ok(ReportFormat::Text),
            "json" => Ok(ReportFormat::Json),
            _ => Err(format!("Invalid output format: {}. Valid options: text, json", s)),
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportFormat::Text => write!(f, "text"),
            ReportFormat::Json => write!(f, "json"),
        }
    }
}

/// Render a report in the requested format
pub fn render_report(report: &HotspotReport, format: ReportFormat, colours: &ColourManager) -> Result<String> {
    match format {
        ReportFormat::Text => Ok(render_text(report, colours)),
        ReportFormat::Json => serde_json::to_string_pretty(report)
            .context("Failed to serialize hotspot report to JSON"),
    }
}

fn timestamp(at: &DateTime<Utc>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

fn render_text(report: &HotspotReport, colours: &ColourManager) -> String {
    let mut out = String::new();

    let window = format!(
        "Hotspots from {} to {}",
        timestamp(&report.oldest_commit),
        timestamp(&report.now)
    );
    let detail = format!(
        "lookback: {} days, baseline: {}, commits analyzed: {}",
        report.lookback_days, report.baseline, report.commits_analyzed
    );
    out.push_str(&format!("{}\n{}\n", colours.header(&window), colours.header(&detail)));

    for spot in &report.spots {
        out.push_str(&format!(
            "Score: {} File: {}\n",
            colours.score(&format!("{:.6}", spot.score)),
            colours.path(&spot.path)
        ));
    }

    out.push_str(&format!(
        "{}\n",
        colours.count(&format!("hotspot count: {}", report.total_files))
    ));

    if report.skipped_count() > 0 {
        out.push_str(&format!(
            "{}\n",
            colours.warning(&format!(
                "skipped {} of {} commits",
                report.skipped_count(),
                report.commits_analyzed
            ))
        ));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hotspot::{DiffBaseline, RankedSpot, SkippedCommit};
    use chrono::TimeZone;

    fn sample_report() -> HotspotReport {
        HotspotReport {
            now: Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
            oldest_commit: Utc.timestamp_opt(1_700_000_000 - 100 * 86_400, 0).unwrap(),
            lookback_days: 180,
            baseline: DiffBaseline::PreviousCommit,
            commits_analyzed: 3,
            skipped: vec![SkippedCommit {
                id: "deadbeef".to_string(),
                reason: "object not found".to_string(),
            }],
            total_files: 3,
            spots: vec![
                RankedSpot { path: "a.txt".to_string(), score: 0.500006144, touches: 2 },
                RankedSpot { path: "b.txt".to_string(), score: 0.5, touches: 1 },
            ],
        }
    }

    #[test]
    fn test_report_format_parsing() {
        assert_eq!("text".parse::<ReportFormat>().unwrap(), ReportFormat::Text);
        assert_eq!("JSON".parse::<ReportFormat>().unwrap(), ReportFormat::Json);
        assert!("xml".parse::<ReportFormat>().is_err());
        assert_eq!(ReportFormat::default(), ReportFormat::Text);
        assert_eq!(ReportFormat::Json.to_string(), "json");
    }

    #[test]
    fn test_text_rendering() {
        let output = render_report(&sample_report(), ReportFormat::Text, &ColourManager::with_colours(false)).unwrap();
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines[0], "Hotspots from 2023-08-06 22:13:20 UTC to 2023-11-14 22:13:20 UTC");
        assert_eq!(lines[1], "lookback: 180 days, baseline: previous, commits analyzed: 3");
        assert_eq!(lines[2], "Score: 0.500006 File: a.txt");
        assert_eq!(lines[3], "Score: 0.500000 File: b.txt");
        assert_eq!(lines[4], "hotspot count: 3");
        assert_eq!(lines[5], "skipped 1 of 3 commits");
        assert_eq!(lines.len(), 6);
    }

    #[test]
    fn test_text_rendering_without_skips() {
        let mut report = sample_report();
        report.skipped.clear();
        let output = render_report(&report, ReportFormat::Text, &ColourManager::with_colours(false)).unwrap();
        assert!(!output.contains("skipped"));
        assert!(output.ends_with("hotspot count: 3\n"));
    }

    #[test]
    fn test_json_rendering() {
        let report = sample_report();
        let output = render_report(&report, ReportFormat::Json, &ColourManager::with_colours(false)).unwrap();
        let parsed: HotspotReport = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed, report);
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let report = sample_report();
        let colours = ColourManager::with_colours(false);
        for format in [ReportFormat::Text, ReportFormat::Json] {
            let first = render_report(&report, format, &colours).unwrap();
            let second = render_report(&report, format, &colours).unwrap();
            assert_eq!(first, second);
        }
    }
}
