use clap::{ArgAction, Parser};
use anyhow::Result;
use std::path::PathBuf;
use log::{debug, info};

use super::duration_parser::parse_lookback;
use super::enhanced_parser::parse_comma_separated;

/// Git Hotspot Scorer
#[derive(Parser, Debug)]
#[command(name = "gspots")]
#[command(about = "Ranks the files of a git repository by recent, recency-weighted change activity")]
#[command(version)]
pub struct Args {
    /// Path to git repository (defaults to current directory)
    #[arg(value_name = "PATH", conflicts_with = "repository")]
    pub path: Option<String>,

    /// Path to git repository, same as the positional PATH
    #[arg(short = 'r', long = "repo", alias = "repository", value_name = "PATH")]
    pub repository: Option<String>,

    /// Lookback window, e.g. "180d", "6 months", "2w" (default: 6 months)
    #[arg(short = 'l', long = "lookback", value_name = "DURATION")]
    pub lookback: Option<String>,

    /// Reference the history walk starts from (default: HEAD)
    #[arg(long = "ref", value_name = "REF")]
    pub reference: Option<String>,

    /// Tree each commit is diffed against: newest or previous
    #[arg(long = "baseline", value_name = "BASELINE")]
    pub baseline: Option<String>,

    /// Maximum number of hotspots to show, 0 for all (default: 100)
    #[arg(short = 'L', long = "limit", value_name = "N")]
    pub limit: Option<usize>,

    /// Worker threads for diff computation, 0 for one per core, 1 for sequential
    #[arg(short = 'j', long = "threads", value_name = "N")]
    pub threads: Option<usize>,

    /// Include paths (prefixes) - supports comma-separated values
    #[arg(short = 'I', long = "include-path", value_name = "PATH", action = ArgAction::Append)]
    pub include_path: Vec<String>,

    /// Exclude paths (prefixes) - supports comma-separated values
    #[arg(short = 'X', long = "exclude-path", value_name = "PATH", action = ArgAction::Append)]
    pub exclude_path: Vec<String>,

    /// Output format: text or json
    #[arg(short = 'f', long = "format", value_name = "FORMAT")]
    pub format: Option<String>,

    /// Disable coloured output
    #[arg(long = "no-color")]
    pub no_color: bool,

    /// Force coloured output even when not writing to a terminal
    #[arg(long = "color", conflicts_with = "no_color")]
    pub color: bool,

    /// Verbose output (debug level logging)
    #[arg(short, long)]
    pub verbose: bool,

    /// Quiet output (error level logging only)
    #[arg(short, long)]
    pub quiet: bool,

    /// Debug output (trace level logging)
    #[arg(long)]
    pub debug: bool,

    /// Log format: text or json
    #[arg(long, value_name = "FORMAT", default_value = "text")]
    pub log_format: String,

    /// Log file path for file output
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Log level for file output (independent of console level)
    #[arg(long, value_name = "LEVEL")]
    pub log_file_level: Option<String>,

    /// Configuration file path
    #[arg(long, value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Configuration section name
    #[arg(long, value_name = "SECTION")]
    pub config_name: Option<String>,
}

impl Args {
    /// Repository given either positionally or with `--repo`
    pub fn repository_path(&self) -> Option<&str> {
        self.path.as_deref().or(self.repository.as_deref())
    }

    /// Split comma-separated path lists
    pub fn apply_enhanced_parsing(mut self) -> Self {
        self.include_path = parse_comma_separated(self.include_path);
        self.exclude_path = parse_comma_separated(self.exclude_path);
        self
    }
}

/// Parse command line arguments
pub fn parse_args() -> Args {
    let args = Args::parse().apply_enhanced_parsing();
    debug!("Parsed CLI arguments with enhanced parsing: {:?}", args);
    args
}

/// Validate CLI argument combinations
pub fn validate_args(args: &Args) -> Result<()> {
    debug!("Validating CLI argument combinations");

    let log_flags_count = [args.verbose, args.quiet, args.debug]
        .iter()
        .filter(|&&flag| flag)
        .count();

    if log_flags_count > 1 {
        return Err(anyhow::anyhow!(
            "Conflicting log level flags: only one of --verbose, --quiet, or --debug may be specified"
        ));
    }

    match args.log_format.to_lowercase().as_str() {
        "text" | "json" => {},
        _ => return Err(anyhow::anyhow!(
            "Invalid log format '{}'. Valid options: text, json", args.log_format
        )),
    }

    if let Some(ref level) = args.log_file_level {
        match level.to_lowercase().as_str() {
            "error" | "warn" | "info" | "debug" | "trace" => {},
            _ => return Err(anyhow::anyhow!(
                "Invalid log file level '{}'. Valid levels: error, warn, info, debug, trace", level
            )),
        }
    }

    if args.log_file_level.is_some() && args.log_file.is_none() {
        return Err(anyhow::anyhow!(
            "--log-file-level requires --log-file to be specified"
        ));
    }

    if let Some(ref lookback) = args.lookback {
        parse_lookback(lookback)?;
    }

    if let Some(ref baseline) = args.baseline {
        baseline.parse::<crate::hotspot::DiffBaseline>()
            .map_err(|e| anyhow::anyhow!(e))?;
    }

    if let Some(ref format) = args.format {
        format.parse::<crate::display::ReportFormat>()
            .map_err(|e| anyhow::anyhow!(e))?;
    }

    if let Some(ref reference) = args.reference {
        if reference.trim().is_empty() {
            return Err(anyhow::anyhow!("--ref must not be empty"));
        }
    }

    info!("CLI arguments validated successfully");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Create Args with default values for testing
    fn create_test_args() -> Args {
        Args {
            path: None,
            repository: None,
            lookback: None,
            reference: None,
            baseline: None,
            limit: None,
            threads: None,
            include_path: Vec::new(),
            exclude_path: Vec::new(),
            format: None,
            no_color: false,
            color: false,
            verbose: false,
            quiet: false,
            debug: false,
            log_format: "text".to_string(),
            log_file: None,
            log_file_level: None,
            config_file: None,
            config_name: None,
        }
    }

    #[test]
    fn test_validate_args_success() {
        let args = Args {
            verbose: true,
            log_format: "json".to_string(),
            lookback: Some("90d".to_string()),
            baseline: Some("previous".to_string()),
            format: Some("json".to_string()),
            ..create_test_args()
        };
        assert!(validate_args(&args).is_ok());
    }

    #[test]
    fn test_validate_args_conflicting_flags() {
        let args = Args {
            verbose: true,
            quiet: true,
            ..create_test_args()
        };
        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_validate_args_invalid_log_format() {
        let args = Args {
            log_format: "invalid".to_string(),
            ..create_test_args()
        };
        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_validate_args_file_level_without_file() {
        let args = Args {
            log_file_level: Some("debug".to_string()),
            ..create_test_args()
        };
        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_validate_args_bad_lookback() {
        let args = Args {
            lookback: Some("soon".to_string()),
            ..create_test_args()
        };
        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_validate_args_bad_baseline_and_format() {
        let args = Args {
            baseline: Some("grandparent".to_string()),
            ..create_test_args()
        };
        assert!(validate_args(&args).is_err());

        let args = Args {
            format: Some("xml".to_string()),
            ..create_test_args()
        };
        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_enhanced_parsing_comma_separated() {
        let args = Args {
            include_path: vec!["src/,tests/".to_string(), "lib/".to_string()],
            exclude_path: vec!["target/ , vendor/".to_string()],
            ..create_test_args()
        }.apply_enhanced_parsing();

        assert_eq!(args.include_path, vec!["src/", "tests/", "lib/"]);
        assert_eq!(args.exclude_path, vec!["target/", "vendor/"]);
    }

    #[test]
    fn test_clap_parsing() {
        let args = Args::try_parse_from([
            "gspots", "--repo", "/tmp/repo", "-l", "6 months", "-L", "20", "--baseline", "previous",
            "-I", "src/", "-f", "json",
        ]).unwrap();

        assert_eq!(args.repository.as_deref(), Some("/tmp/repo"));
        assert_eq!(args.lookback.as_deref(), Some("6 months"));
        assert_eq!(args.limit, Some(20));
        assert_eq!(args.baseline.as_deref(), Some("previous"));
        assert_eq!(args.include_path, vec!["src/"]);
        assert_eq!(args.format.as_deref(), Some("json"));
    }

    #[test]
    fn test_positional_repository_path() {
        let args = Args::try_parse_from(["gspots", "/tmp/repo", "-L", "5"]).unwrap();
        assert_eq!(args.path.as_deref(), Some("/tmp/repo"));
        assert_eq!(args.repository_path(), Some("/tmp/repo"));

        let args = Args::try_parse_from(["gspots", "-r", "/tmp/other"]).unwrap();
        assert_eq!(args.repository_path(), Some("/tmp/other"));

        let args = Args::try_parse_from(["gspots"]).unwrap();
        assert_eq!(args.repository_path(), None);
    }

    #[test]
    fn test_positional_path_conflicts_with_repo_flag() {
        let result = Args::try_parse_from(["gspots", "/tmp/repo", "--repo", "/tmp/other"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_color_flags_conflict() {
        let result = Args::try_parse_from(["gspots", "--color", "--no-color"]);
        assert!(result.is_err());
    }
}
