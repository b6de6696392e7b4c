use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::PathBuf;
use anyhow::{Context, Result};
use toml::Value;
use log::{debug, info};
use crate::cli::duration_parser::parse_lookback;
use crate::cli::enhanced_parser::parse_comma_separated;
use crate::display::{ColourConfig, ColourTheme, ReportFormat};
use crate::hotspot::{DiffBaseline, RankLimit};

/// Configuration storage - section_name -> key -> value
pub type Configuration = HashMap<String, HashMap<String, String>>;

/// Section holding the analysis settings
pub const HOTSPOT_SECTION: &str = "hotspot";

/// Analysis settings read from the `[hotspot]` section; unset keys stay `None`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HotspotSettings {
    pub lookback: Option<chrono::Duration>,
    pub reference: Option<String>,
    pub baseline: Option<DiffBaseline>,
    pub limit: Option<RankLimit>,
    pub threads: Option<usize>,
    pub include_path: Vec<String>,
    pub exclude_path: Vec<String>,
    pub format: Option<ReportFormat>,
}

/// Configuration manager
pub struct ConfigManager {
    config: Configuration,
    selected_section: Option<String>,
}

impl ConfigManager {
    /// Create a new ConfigManager from a Configuration (primarily for testing)
    pub fn from_config(config: Configuration) -> Self {
        Self {
            config,
            selected_section: None,
        }
    }

    /// Load configuration using discovery hierarchy
    pub fn load() -> Result<Self> {
        debug!("Starting configuration discovery");

        for path in discover_config_files() {
            debug!("Attempting to load config from: {}", path.display());
            if path.exists() {
                return Self::load_from_file(path);
            }
        }

        info!("No configuration file found, using empty configuration");
        Ok(Self::from_config(Configuration::new()))
    }

    /// Load configuration from explicit file path
    pub fn load_from_file(path: PathBuf) -> Result<Self> {
        debug!("Loading configuration from file: {}", path.display());

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config = parse_toml_config(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        info!("Loaded configuration from: {}", path.display());
        Ok(Self::from_config(config))
    }

    /// Get value from configuration with section fallback
    pub fn get_value(&self, section: &str, key: &str) -> Option<&String> {
        // Priority: selected_section -> specified section -> base
        if let Some(selected) = &self.selected_section {
            if let Some(value) = self.config.get(selected).and_then(|s| s.get(key)) {
                return Some(value);
            }
        }

        if let Some(value) = self.config.get(section).and_then(|s| s.get(key)) {
            return Some(value);
        }

        self.config.get("base").and_then(|s| s.get(key))
    }

    /// Select configuration section for --config-name
    pub fn select_section(&mut self, section: String) {
        debug!("Selecting configuration section: {}", section);
        self.selected_section = Some(section);
    }

    /// Get boolean value with type conversion
    pub fn get_bool(&self, section: &str, key: &str) -> Result<Option<bool>> {
        match self.get_value(section, key) {
            Some(value) => match value.to_lowercase().as_str() {
                "true" => Ok(Some(true)),
                "false" => Ok(Some(false)),
                _ => Err(anyhow::anyhow!("Invalid boolean value for {}.{}: {}", section, key, value)),
            },
            None => Ok(None),
        }
    }

    /// Get unsigned integer value with type conversion
    pub fn get_usize(&self, section: &str, key: &str) -> Result<Option<usize>> {
        match self.get_value(section, key) {
            Some(value) => value.parse::<usize>()
                .map(Some)
                .with_context(|| format!("Invalid {}.{} value in config: {}", section, key, value)),
            None => Ok(None),
        }
    }

    /// Get log level value with type conversion
    pub fn get_log_level(&self, section: &str, key: &str) -> Result<Option<log::LevelFilter>> {
        match self.get_value(section, key) {
            Some(value) => Ok(Some(crate::logging::parse_log_level(value)?)),
            None => Ok(None),
        }
    }

    /// Get path value with type conversion
    pub fn get_path(&self, section: &str, key: &str) -> Option<PathBuf> {
        self.get_value(section, key).map(PathBuf::from)
    }

    /// Get a comma-separated (or TOML array) list value
    pub fn get_list(&self, section: &str, key: &str) -> Vec<String> {
        self.get_value(section, key)
            .map(|value| parse_comma_separated(vec![value.clone()]))
            .unwrap_or_default()
    }

    /// Get colour settings from `color` and `theme` in `[base]`
    pub fn get_colour_config(&self) -> Result<ColourConfig> {
        let mut colour_config = ColourConfig::default();

        if let Some(enabled) = self.get_bool("base", "color")? {
            colour_config.set_enabled(enabled);
        }

        if let Some(theme) = self.get_value("base", "theme") {
            let theme = theme.parse::<ColourTheme>()
                .map_err(|e| anyhow::anyhow!(e))?;
            colour_config.set_theme(theme);
        }

        Ok(colour_config)
    }

    /// Get analysis settings from the `[hotspot]` section
    pub fn get_hotspot_settings(&self) -> Result<HotspotSettings> {
        let section = HOTSPOT_SECTION;
        let mut settings = HotspotSettings::default();

        if let Some(lookback) = self.get_value(section, "lookback") {
            let duration = parse_lookback(lookback)
                .with_context(|| format!("Invalid lookback value in config: {}", lookback))?;
            settings.lookback = Some(duration);
        }

        settings.reference = self.get_value(section, "reference").cloned();

        if let Some(baseline) = self.get_value(section, "baseline") {
            let baseline = baseline.parse::<DiffBaseline>()
                .map_err(|e| anyhow::anyhow!(e))?;
            settings.baseline = Some(baseline);
        }

        settings.limit = self.get_usize(section, "limit")?.map(RankLimit::from_count);
        settings.threads = self.get_usize(section, "threads")?;
        settings.include_path = self.get_list(section, "include-path");
        settings.exclude_path = self.get_list(section, "exclude-path");

        if let Some(format) = self.get_value(section, "format") {
            let format = format.parse::<ReportFormat>()
                .map_err(|e| anyhow::anyhow!(e))?;
            settings.format = Some(format);
        }

        debug!("Hotspot settings from config: {:?}", settings);
        Ok(settings)
    }
}

/// Discover configuration files in order of precedence
fn discover_config_files() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    // 1. Environment variable $GSPOTS_CONFIG
    if let Ok(env_path) = env::var("GSPOTS_CONFIG") {
        paths.push(PathBuf::from(env_path));
    }

    // 2. XDG config directory
    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("gspots").join("config.toml"));
    }

    // 3. Home directory
    if let Some(home_dir) = dirs::home_dir() {
        paths.push(home_dir.join(".gspots.toml"));
    }

    // 4. Project local
    paths.push(PathBuf::from("./.gspots.toml"));

    debug!("Config discovery paths: {:?}", paths);
    paths
}

/// Parse TOML content to string-based configuration
fn parse_toml_config(content: &str) -> Result<Configuration> {
    let toml_value: Value = content.parse()
        .context("Failed to parse TOML content")?;

    let mut config = Configuration::new();

    if let Value::Table(table) = toml_value {
        flatten_toml_table(&table, String::new(), &mut config);
    }

    debug!("Parsed configuration: {:?}", config);
    Ok(config)
}

/// Recursively flatten TOML tables into section.subsection format
fn flatten_toml_table(table: &toml::Table, prefix: String, config: &mut Configuration) {
    for (key, value) in table {
        let section_name = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", prefix, key)
        };

        match value {
            Value::Table(subtable) => {
                if subtable.values().all(|v| !matches!(v, Value::Table(_))) {
                    // leaf table: a configuration section
                    let section_map = subtable
                        .iter()
                        .map(|(subkey, subvalue)| (subkey.clone(), toml_value_to_string(subvalue)))
                        .collect();
                    config.insert(section_name, section_map);
                } else {
                    flatten_toml_table(subtable, section_name, config);
                }
            }
            _ => {
                // top-level keys belong to [base]
                config
                    .entry("base".to_string())
                    .or_default()
                    .insert(key.clone(), toml_value_to_string(value));
            }
        }
    }
}

/// Convert TOML Value to string representation; string arrays become comma-separated lists
fn toml_value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Integer(i) => i.to_string(),
        Value::Float(f) => f.to_string(),
        Value::Boolean(b) => b.to_string(),
        Value::Array(items) if items.iter().all(|v| v.is_str()) => items
            .iter()
            .filter_map(|v| v.as_str())
            .collect::<Vec<_>>()
            .join(","),
        _ => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::NamedTempFile;

    #[test]
    fn test_toml_value_to_string_conversion() {
        assert_eq!(toml_value_to_string(&Value::String("test".to_string())), "test");
        assert_eq!(toml_value_to_string(&Value::Integer(42)), "42");
        assert_eq!(toml_value_to_string(&Value::Boolean(false)), "false");
        let array = Value::Array(vec![Value::String("src/".into()), Value::String("lib/".into())]);
        assert_eq!(toml_value_to_string(&array), "src/,lib/");
    }

    #[test]
    fn test_parse_toml_config() {
        let toml_content = r#"
[base]
console-level = "warn"
log-format = "json"

[hotspot]
lookback = "90d"
limit = 20
"#;

        let config = parse_toml_config(toml_content).unwrap();

        assert_eq!(config.get("base").unwrap().get("console-level").unwrap(), "warn");
        assert_eq!(config.get("base").unwrap().get("log-format").unwrap(), "json");
        assert_eq!(config.get("hotspot").unwrap().get("lookback").unwrap(), "90d");
        assert_eq!(config.get("hotspot").unwrap().get("limit").unwrap(), "20");
    }

    #[test]
    fn test_config_manager_value_retrieval_falls_back_to_base() {
        let mut config = Configuration::new();

        let mut base_section = HashMap::new();
        base_section.insert("limit".to_string(), "10".to_string());
        base_section.insert("format".to_string(), "text".to_string());
        config.insert("base".to_string(), base_section);

        let mut hotspot_section = HashMap::new();
        hotspot_section.insert("format".to_string(), "json".to_string());
        config.insert("hotspot".to_string(), hotspot_section);

        let manager = ConfigManager::from_config(config);

        assert_eq!(manager.get_value("hotspot", "limit").unwrap(), "10");
        assert_eq!(manager.get_value("hotspot", "format").unwrap(), "json");
        assert!(manager.get_value("hotspot", "missing").is_none());
    }

    #[test]
    fn test_config_manager_section_selection() {
        let mut config = Configuration::new();

        let mut hotspot_section = HashMap::new();
        hotspot_section.insert("lookback".to_string(), "180d".to_string());
        config.insert("hotspot".to_string(), hotspot_section);

        let mut quick_section = HashMap::new();
        quick_section.insert("lookback".to_string(), "14d".to_string());
        config.insert("quick".to_string(), quick_section);

        let mut manager = ConfigManager::from_config(config);
        assert_eq!(manager.get_value("hotspot", "lookback").unwrap(), "180d");

        manager.select_section("quick".to_string());
        assert_eq!(manager.get_value("hotspot", "lookback").unwrap(), "14d");
    }

    #[test]
    fn test_config_manager_type_conversion() {
        let mut config = Configuration::new();

        let mut base_section = HashMap::new();
        base_section.insert("enabled".to_string(), "true".to_string());
        base_section.insert("invalid-bool".to_string(), "maybe".to_string());
        base_section.insert("log-level".to_string(), "info".to_string());
        base_section.insert("threads".to_string(), "four".to_string());
        base_section.insert("path".to_string(), "/tmp/test".to_string());
        config.insert("base".to_string(), base_section);

        let manager = ConfigManager::from_config(config);

        assert_eq!(manager.get_bool("base", "enabled").unwrap(), Some(true));
        assert!(manager.get_bool("base", "invalid-bool").is_err());
        assert!(manager.get_bool("base", "missing").unwrap().is_none());
        assert_eq!(manager.get_log_level("base", "log-level").unwrap(), Some(log::LevelFilter::Info));
        assert!(manager.get_usize("base", "threads").is_err());
        assert_eq!(manager.get_path("base", "path").unwrap(), PathBuf::from("/tmp/test"));
    }

    #[test]
    fn test_colour_config_from_base_section() {
        let mut config = Configuration::new();
        let mut base_section = HashMap::new();
        base_section.insert("color".to_string(), "false".to_string());
        base_section.insert("theme".to_string(), "light".to_string());
        config.insert("base".to_string(), base_section);

        let colour_config = ConfigManager::from_config(config).get_colour_config().unwrap();
        assert!(!colour_config.enabled);
        assert_eq!(colour_config.theme, ColourTheme::Light);

        let empty = ConfigManager::from_config(Configuration::new()).get_colour_config().unwrap();
        assert_eq!(empty, ColourConfig::default());
    }

    #[test]
    fn test_hotspot_settings_from_file() {
        let toml_content = r#"
[hotspot]
lookback = "6 months"
reference = "main"
baseline = "previous"
limit = 0
threads = 4
include-path = ["src/", "lib/"]
exclude-path = "src/generated/"
format = "json"
"#;

        let temp_file = NamedTempFile::new().unwrap();
        fs::write(&temp_file, toml_content).unwrap();

        let manager = ConfigManager::load_from_file(temp_file.path().to_path_buf()).unwrap();

        let settings = manager.get_hotspot_settings().unwrap();
        assert_eq!(settings.lookback, Some(chrono::Duration::days(180)));
        assert_eq!(settings.reference.as_deref(), Some("main"));
        assert_eq!(settings.baseline, Some(DiffBaseline::PreviousCommit));
        assert_eq!(settings.limit, Some(RankLimit::All));
        assert_eq!(settings.threads, Some(4));
        assert_eq!(settings.include_path, vec!["src/", "lib/"]);
        assert_eq!(settings.exclude_path, vec!["src/generated/"]);
        assert_eq!(settings.format, Some(ReportFormat::Json));
    }

    #[test]
    fn test_hotspot_settings_defaults_when_empty() {
        let manager = ConfigManager::from_config(Configuration::new());
        assert_eq!(manager.get_hotspot_settings().unwrap(), HotspotSettings::default());
    }

    #[test]
    fn test_hotspot_settings_invalid_values() {
        let toml_content = r#"
[hotspot]
lookback = "forever"
"#;
        let temp_file = NamedTempFile::new().unwrap();
        fs::write(&temp_file, toml_content).unwrap();

        let manager = ConfigManager::load_from_file(temp_file.path().to_path_buf()).unwrap();
        assert!(manager.get_hotspot_settings().is_err());
    }
}
