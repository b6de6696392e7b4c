//! Colour configuration and themes for report output

use colored::Color;
use serde::{Deserialize, Serialize};

/// Colour configuration for the display system
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ColourConfig {
    /// Whether colours are enabled globally
    pub enabled: bool,
    /// The colour theme to use
    pub theme: ColourTheme,
    /// Whether to respect NO_COLOR environment variable
    pub respect_no_color: bool,
    /// Force colours even when not in a TTY (--color flag)
    #[serde(skip, default)]
    pub color_forced: bool,
}

impl Default for ColourConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            theme: ColourTheme::Auto,
            respect_no_color: true,
            color_forced: false,
        }
    }
}

/// Available colour themes
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColourTheme {
    Auto,
    Light,
    Dark,
}

impl std::str::FromStr for ColourTheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "auto" => Ok(ColourTheme::Auto),
            "light" => Ok(ColourTheme::Light),
            "dark" => Ok(ColourTheme::Dark),
            _ => Err(format!("Invalid colour theme: {}. Valid options: auto, light, dark", s)),
        }
    }
}

/// Colours for each part of a hotspot report
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ColourPalette {
    /// Report header lines
    pub header: String,
    /// Score column
    pub score: String,
    /// File path column
    pub path: String,
    /// Hotspot count footer
    pub count: String,
    /// Skipped commit summary
    pub warning: String,
}

impl Default for ColourPalette {
    fn default() -> Self {
        Self {
            header: "cyan".to_string(),
            score: "yellow".to_string(),
            path: "white".to_string(),
            count: "green".to_string(),
            warning: "red".to_string(),
        }
    }
}

impl ColourPalette {
    /// Palette for light backgrounds
    pub fn light() -> Self {
        Self {
            header: "blue".to_string(),
            score: "magenta".to_string(),
            path: "black".to_string(),
            count: "green".to_string(),
            warning: "red".to_string(),
        }
    }

    /// Palette for dark backgrounds
    pub fn dark() -> Self {
        Self {
            header: "bright_cyan".to_string(),
            score: "bright_yellow".to_string(),
            path: "bright_white".to_string(),
            count: "bright_green".to_string(),
            warning: "bright_red".to_string(),
        }
    }

    /// Parse a colour string into a Color enum
    pub fn parse_color(color_str: &str) -> Option<Color> {
        match color_str.to_lowercase().as_str() {
            "black" => Some(Color::Black),
            "red" => Some(Color::Red),
            "green" => Some(Color::Green),
            "yellow" => Some(Color::Yellow),
            "blue" => Some(Color::Blue),
            "magenta" => Some(Color::Magenta),
            "cyan" => Some(Color::Cyan),
            "white" => Some(Color::White),
            "bright_black" => Some(Color::BrightBlack),
            "bright_red" => Some(Color::BrightRed),
            "bright_green" => Some(Color::BrightGreen),
            "bright_yellow" => Some(Color::BrightYellow),
            "bright_blue" => Some(Color::BrightBlue),
            "bright_magenta" => Some(Color::BrightMagenta),
            "bright_cyan" => Some(Color::BrightCyan),
            "bright_white" => Some(Color::BrightWhite),
            _ => None,
        }
    }
}

impl ColourTheme {
    pub fn get_palette(&self) -> ColourPalette {
        match self {
            // no background detection, assume dark
            ColourTheme::Auto | ColourTheme::Dark => ColourPalette::dark(),
            ColourTheme::Light => ColourPalette::light(),
        }
    }
}

impl ColourConfig {
    /// Create a colour configuration with colours disabled
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn set_theme(&mut self, theme: ColourTheme) {
        self.theme = theme;
    }

    /// Force colours to be enabled (--color flag)
    pub fn set_color_forced(&mut self, forced: bool) {
        self.color_forced = forced;
    }

    /// Check if colours should be enabled based on configuration and environment
    pub fn should_use_colours(&self) -> bool {
        if !self.enabled {
            return false;
        }

        if self.color_forced {
            return true;
        }

        if self.respect_no_color && std::env::var_os("NO_COLOR").is_some() {
            return false;
        }

        use std::io::IsTerminal;
        std::io::stdout().is_terminal()
    }

    pub fn get_palette(&self) -> ColourPalette {
        self.theme.get_palette()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_colour_config() {
        let config = ColourConfig::default();
        assert!(config.enabled);
        assert_eq!(config.theme, ColourTheme::Auto);
        assert!(config.respect_no_color);
        assert!(!config.color_forced);
    }

    #[test]
    fn test_disabled_colour_config() {
        let mut config = ColourConfig::disabled();
        assert!(!config.should_use_colours());

        // disabled wins over --color
        config.set_color_forced(true);
        assert!(!config.should_use_colours());
    }

    #[test]
    fn test_forced_colours() {
        let mut config = ColourConfig::default();
        config.set_color_forced(true);
        assert!(config.should_use_colours());
    }

    #[test]
    fn test_theme_parsing() {
        assert_eq!("light".parse::<ColourTheme>().unwrap(), ColourTheme::Light);
        assert_eq!(" DARK ".parse::<ColourTheme>().unwrap(), ColourTheme::Dark);
        assert!("solarized".parse::<ColourTheme>().is_err());
    }

    #[test]
    fn test_theme_palettes() {
        assert_eq!(ColourTheme::Auto.get_palette(), ColourPalette::dark());
        assert_eq!(ColourTheme::Light.get_palette().path, "black");
        assert_eq!(ColourTheme::Dark.get_palette().path, "bright_white");
    }

    #[test]
    fn test_parse_color() {
        assert_eq!(ColourPalette::parse_color("red"), Some(Color::Red));
        assert_eq!(ColourPalette::parse_color("Bright_Green"), Some(Color::BrightGreen));
        assert_eq!(ColourPalette::parse_color("invalid"), None);
    }
}
