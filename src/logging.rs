// Logging module for gspots
// Structured logging behind the `log` facade: text or JSON lines, written to
// stderr and/or a log file with independent levels.
//
// Example usage:
// ```
// let config = LogConfig {
//     console_level: LevelFilter::Info,
//     file_level: Some(LevelFilter::Debug),
//     format: LogFormat::Json,
//     destination: LogDestination::Both(PathBuf::from("gspots.log")),
//     enable_colours: false,
// };
// init_logger(config)?;
// log::info!("Analysis started");
// ```

use log::{Level, LevelFilter};
use serde::{Deserialize, Serialize};
use chrono::{DateTime, Local};
use colored::Colorize;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::PathBuf;
use anyhow::{Context, Result};

/// Log output format options
#[derive(Debug, Clone, PartialEq)]
pub enum LogFormat {
    Text,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            _ => Err(format!("Invalid log format: {}. Valid options: text, json", s)),
        }
    }
}

/// Log destination options
#[derive(Debug, Clone, PartialEq)]
pub enum LogDestination {
    Console,
    File(PathBuf),
    Both(PathBuf),
}

/// JSON log entry structure
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonLogEntry {
    pub timestamp: String,
    pub level: String,
    pub target: String,
    pub message: String,
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LogConfig {
    pub console_level: LevelFilter,
    pub file_level: Option<LevelFilter>,
    pub format: LogFormat,
    pub destination: LogDestination,
    /// Colour the level tag of console text output
    pub enable_colours: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            console_level: LevelFilter::Info,
            file_level: None,
            format: LogFormat::Text,
            destination: LogDestination::Console,
            enable_colours: false,
        }
    }
}

/// Logger writing to stderr and/or a file
pub struct SpotsLogger {
    config: LogConfig,
}

impl SpotsLogger {
    pub fn new(config: LogConfig) -> Self {
        Self { config }
    }

    fn format_timestamp() -> String {
        let now: DateTime<Local> = Local::now();
        now.format("%Y-%m-%d %H:%M:%S").to_string()
    }

    fn level_tag(level: Level, colour: bool) -> String {
        let tag = level.to_string().to_uppercase();
        if !colour {
            return tag;
        }
        match level {
            Level::Error => tag.red().to_string(),
            Level::Warn => tag.yellow().to_string(),
            Level::Info => tag.blue().to_string(),
            Level::Debug | Level::Trace => tag.bright_black().to_string(),
        }
    }

    fn format_text_message(&self, level: Level, message: &str, colour: bool) -> String {
        format!("{} [{}] {}", Self::format_timestamp(), Self::level_tag(level, colour), message)
    }

    fn format_json_message(&self, level: Level, target: &str, message: &str) -> Result<String> {
        let entry = JsonLogEntry {
            timestamp: Self::format_timestamp(),
            level: level.to_string().to_uppercase(),
            target: target.to_string(),
            message: message.to_string(),
        };

        serde_json::to_string(&entry)
            .context("Failed to serialize log entry to JSON")
    }

    fn format_record(&self, record: &log::Record, colour: bool) -> String {
        let message = record.args().to_string();
        match self.config.format {
            LogFormat::Text => self.format_text_message(record.level(), &message, colour),
            LogFormat::Json => self
                .format_json_message(record.level(), record.target(), &message)
                .unwrap_or_else(|e| {
                    eprintln!("JSON formatting error: {}. Falling back to text format.", e);
                    self.format_text_message(record.level(), &message, false)
                }),
        }
    }

    fn should_log_to_console(&self, level: Level) -> bool {
        match self.config.destination {
            LogDestination::File(_) => false,
            _ => level <= self.config.console_level,
        }
    }

    fn should_log_to_file(&self, level: Level) -> bool {
        match (&self.config.destination, self.config.file_level) {
            (LogDestination::Console, _) => false,
            (_, Some(file_level)) => level <= file_level,
            (_, None) => false,
        }
    }

    fn log_file(&self) -> Option<&PathBuf> {
        match &self.config.destination {
            LogDestination::Console => None,
            LogDestination::File(path) | LogDestination::Both(path) => Some(path),
        }
    }

    fn write_to_console(&self, formatted_message: &str) -> Result<()> {
        writeln!(io::stderr(), "{}", formatted_message)
            .context("Failed to write to console")
    }

    fn write_to_file(&self, formatted_message: &str, file_path: &PathBuf) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(file_path)
            .with_context(|| format!("Failed to open log file: {}", file_path.display()))?;

        writeln!(file, "{}", formatted_message)
            .context("Failed to write to log file")
    }
}

impl log::Log for SpotsLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        self.should_log_to_console(metadata.level()) ||
        self.should_log_to_file(metadata.level())
    }

    fn log(&self, record: &log::Record) {
        let level = record.level();

        if self.should_log_to_console(level) {
            let formatted = self.format_record(record, self.config.enable_colours);
            if let Err(e) = self.write_to_console(&formatted) {
                eprintln!("Console logging error: {}", e);
            }
        }

        if self.should_log_to_file(level) {
            if let Some(path) = self.log_file() {
                let formatted = self.format_record(record, false);
                if let Err(e) = self.write_to_file(&formatted, path) {
                    eprintln!("File logging error: {}", e);
                }
            }
        }
    }

    fn flush(&self) {
        let _ = io::stderr().flush();
    }
}

/// Initialize the logging system with the given configuration
pub fn init_logger(config: LogConfig) -> Result<()> {
    let max_level = match config.file_level {
        Some(file_level) => file_level.max(config.console_level),
        None => config.console_level,
    };

    log::set_boxed_logger(Box::new(SpotsLogger::new(config)))
        .context("Failed to set global logger")?;

    log::set_max_level(max_level);

    Ok(())
}

/// Convert string to LevelFilter
pub fn parse_log_level(level_str: &str) -> Result<LevelFilter> {
    match level_str.to_lowercase().as_str() {
        "error" => Ok(LevelFilter::Error),
        "warn" => Ok(LevelFilter::Warn),
        "info" => Ok(LevelFilter::Info),
        "debug" => Ok(LevelFilter::Debug),
        "trace" => Ok(LevelFilter::Trace),
        "off" => Ok(LevelFilter::Off),
        _ => Err(anyhow::anyhow!("Invalid log level: {}. Valid levels: error, warn, info, debug, trace, off", level_str)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::Log;
    use tempfile::TempDir;

    #[test]
    fn test_log_format_parsing() {
        assert_eq!("text".parse::<LogFormat>().unwrap(), LogFormat::Text);
        assert_eq!("JSON".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert!("invalid".parse::<LogFormat>().is_err());
    }

    #[test]
    fn test_log_level_parsing() {
        assert_eq!(parse_log_level("error").unwrap(), LevelFilter::Error);
        assert_eq!(parse_log_level("WARN").unwrap(), LevelFilter::Warn);
        assert_eq!(parse_log_level("trace").unwrap(), LevelFilter::Trace);
        assert_eq!(parse_log_level("off").unwrap(), LevelFilter::Off);
        assert!(parse_log_level("invalid").is_err());
    }

    #[test]
    fn test_timestamp_format() {
        let timestamp = SpotsLogger::format_timestamp();
        assert_eq!(timestamp.len(), 19);
        assert_eq!(timestamp.chars().nth(4), Some('-'));
        assert_eq!(timestamp.chars().nth(10), Some(' '));
        assert_eq!(timestamp.chars().nth(13), Some(':'));
    }

    #[test]
    fn test_text_message_formatting() {
        let logger = SpotsLogger::new(LogConfig::default());
        let formatted = logger.format_text_message(Level::Warn, "Skipping commit", false);
        assert!(formatted.contains("[WARN] Skipping commit"));
    }

    #[test]
    fn test_json_message_formatting() {
        let logger = SpotsLogger::new(LogConfig::default());
        let formatted = logger
            .format_json_message(Level::Info, "gspots::hotspot", "Ranked 3 files")
            .unwrap();
        let entry: JsonLogEntry = serde_json::from_str(&formatted).unwrap();
        assert_eq!(entry.level, "INFO");
        assert_eq!(entry.target, "gspots::hotspot");
        assert_eq!(entry.message, "Ranked 3 files");
    }

    #[test]
    fn test_destination_routing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("gspots.log");

        let console_only = SpotsLogger::new(LogConfig::default());
        assert!(console_only.should_log_to_console(Level::Info));
        assert!(!console_only.should_log_to_console(Level::Debug));
        assert!(!console_only.should_log_to_file(Level::Error));

        let file_only = SpotsLogger::new(LogConfig {
            file_level: Some(LevelFilter::Debug),
            destination: LogDestination::File(path.clone()),
            ..LogConfig::default()
        });
        assert!(!file_only.should_log_to_console(Level::Error));
        assert!(file_only.should_log_to_file(Level::Debug));
        assert!(!file_only.should_log_to_file(Level::Trace));
    }

    #[test]
    fn test_file_output_is_written() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("gspots.log");
        let logger = SpotsLogger::new(LogConfig {
            console_level: LevelFilter::Off,
            file_level: Some(LevelFilter::Info),
            format: LogFormat::Json,
            destination: LogDestination::File(path.clone()),
            enable_colours: true,
        });

        logger.log(
            &log::Record::builder()
                .args(format_args!("window selected"))
                .level(Level::Info)
                .target("gspots::hotspot::window")
                .build(),
        );

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains(r#""message":"window selected""#));
        assert!(written.contains(r#""target":"gspots::hotspot::window""#));
    }
}
