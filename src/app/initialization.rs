//! Application initialization and configuration

use anyhow::{Context, Result};
use log::{debug, error};
use crate::{cli, config, display, logging};
use crate::cli::duration_parser::parse_lookback;
use crate::hotspot::{AnalysisOptions, DiffBaseline, PathFilter, RankLimit};

/// Everything a run needs after CLI and configuration are merged
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub options: AnalysisOptions,
    pub format: display::ReportFormat,
    /// Print a progress line on stderr during change extraction
    pub show_progress: bool,
}

pub fn load_configuration(args: &cli::Args) -> Result<config::ConfigManager> {
    let mut manager = if let Some(config_file) = &args.config_file {
        debug!("Loading configuration from explicit file: {}", config_file.display());
        config::ConfigManager::load_from_file(config_file.clone())?
    } else {
        config::ConfigManager::load()?
    };

    if let Some(section_name) = &args.config_name {
        debug!("Selecting configuration section: {}", section_name);
        manager.select_section(section_name.clone());
    }

    Ok(manager)
}

pub fn configure_logging(args: &cli::Args, config: &config::ConfigManager) -> Result<logging::LogConfig> {
    use log::LevelFilter;

    let console_level = if args.debug {
        LevelFilter::Trace
    } else if args.verbose {
        LevelFilter::Debug
    } else if args.quiet {
        LevelFilter::Error
    } else {
        match config.get_log_level("base", "console-level") {
            Ok(Some(level)) => level,
            Ok(None) => LevelFilter::Info,
            Err(e) => {
                debug!("Invalid console-level in config, using default: {}", e);
                LevelFilter::Info
            }
        }
    };

    // clap defaults --log-format to "text", so only a non-default value beats the config file
    let format = if args.log_format.to_lowercase() != "text" {
        args.log_format.parse::<logging::LogFormat>()
            .map_err(|e| anyhow::anyhow!(e))?
    } else {
        config.get_value("base", "log-format")
            .and_then(|format_str| format_str.parse::<logging::LogFormat>().ok())
            .unwrap_or(logging::LogFormat::Text)
    };

    let log_file_path = args.log_file.clone()
        .or_else(|| config.get_path("base", "log-file"));

    let file_log_level = match &args.log_file_level {
        Some(level_str) => Some(logging::parse_log_level(level_str)?),
        None => match config.get_log_level("base", "file-log-level") {
            Ok(level) => level,
            Err(e) => {
                debug!("Invalid file-log-level in config, ignoring: {}", e);
                None
            }
        },
    };

    let (destination, file_level) = match (log_file_path, file_log_level) {
        (Some(file_path), Some(level)) => (logging::LogDestination::Both(file_path), Some(level)),
        (Some(file_path), None) => (logging::LogDestination::Both(file_path), Some(console_level)),
        (None, None) => (logging::LogDestination::Console, None),
        (None, Some(_)) => {
            error!("Log file level specified without log file");
            return Err(anyhow::anyhow!("Log file level specified without log file"));
        }
    };

    let enable_colours = log_colours_enabled(args, config, std::io::stderr());

    Ok(logging::LogConfig {
        console_level,
        file_level,
        format,
        destination,
        enable_colours,
    })
}

fn log_colours_enabled(
    args: &cli::Args,
    config: &config::ConfigManager,
    stream: impl std::io::IsTerminal,
) -> bool {
    if args.no_color {
        return false;
    }
    let colour_config = config.get_colour_config().unwrap_or_default();
    if !colour_config.enabled {
        return false;
    }
    if args.color {
        return true;
    }
    std::env::var_os("NO_COLOR").is_none() && stream.is_terminal()
}

/// Create a ColourManager from CLI arguments and configuration file
pub fn create_colour_manager(args: &cli::Args, config: &config::ConfigManager) -> display::ColourManager {
    let colour_config = match config.get_colour_config() {
        Ok(colour_config) => Some(colour_config),
        Err(e) => {
            debug!("Invalid colour settings in config, using defaults: {}", e);
            None
        }
    };
    display::ColourManager::from_color_args(args.no_color, args.color, colour_config)
}

/// Merge CLI flags over the `[hotspot]` configuration over built-in defaults
pub fn build_run_settings(args: &cli::Args, config: &config::ConfigManager) -> Result<RunSettings> {
    let settings = config.get_hotspot_settings()
        .context("Invalid [hotspot] configuration")?;
    let defaults = AnalysisOptions::default();

    let lookback = match &args.lookback {
        Some(lookback) => parse_lookback(lookback)?,
        None => settings.lookback.unwrap_or(defaults.lookback),
    };

    let reference = args.reference.clone()
        .or(settings.reference)
        .unwrap_or(defaults.reference);

    let baseline = match &args.baseline {
        Some(baseline) => baseline.parse::<DiffBaseline>().map_err(|e| anyhow::anyhow!(e))?,
        None => settings.baseline.unwrap_or(defaults.baseline),
    };

    let limit = args.limit
        .map(RankLimit::from_count)
        .or(settings.limit)
        .unwrap_or(defaults.limit);

    let threads = args.threads.or(settings.threads).unwrap_or(defaults.threads);

    let include = if args.include_path.is_empty() { settings.include_path } else { args.include_path.clone() };
    let exclude = if args.exclude_path.is_empty() { settings.exclude_path } else { args.exclude_path.clone() };

    let format = match &args.format {
        Some(format) => format.parse::<display::ReportFormat>().map_err(|e| anyhow::anyhow!(e))?,
        None => settings.format.unwrap_or_default(),
    };

    let options = AnalysisOptions {
        reference,
        lookback,
        baseline,
        limit,
        threads,
        filter: PathFilter::new(include, exclude),
    };
    // machine-readable output and -q stay silent on stderr
    let show_progress = !args.quiet
        && format == display::ReportFormat::Text
        && config.get_bool("hotspot", "progress")?.unwrap_or(true);
    debug!("Analysis options: {:?}, output format: {}, progress: {}", options, format, show_progress);

    Ok(RunSettings { options, format, show_progress })
}
