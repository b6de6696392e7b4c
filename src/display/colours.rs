//! Colour management for report output
//!
//! Honours NO_COLOR, --no-color and --color, and falls back to plain text
//! when stdout is not a terminal.

use colored::{ColoredString, Colorize};
use super::config::{ColourConfig, ColourPalette};

/// Applies the configured palette to report text
#[derive(Debug, Clone)]
pub struct ColourManager {
    config: ColourConfig,
    palette: ColourPalette,
}

impl ColourManager {
    pub fn new() -> Self {
        Self::with_config(ColourConfig::default())
    }

    /// Create a ColourManager with explicit colour control
    pub fn with_colours(enabled: bool) -> Self {
        let mut config = ColourConfig::default();
        config.set_enabled(enabled);
        config.set_color_forced(enabled);
        Self::with_config(config)
    }

    pub fn with_config(config: ColourConfig) -> Self {
        let palette = config.get_palette();
        Self { config, palette }
    }

    /// Precedence: --no-color > --color > configuration file > terminal detection
    pub fn from_color_args(no_color: bool, color: bool, config: Option<ColourConfig>) -> Self {
        let mut final_config = config.unwrap_or_default();

        if no_color {
            final_config.set_enabled(false);
        } else if color {
            final_config.set_enabled(true);
            final_config.set_color_forced(true);
        }

        Self::with_config(final_config)
    }

    pub fn colours_enabled(&self) -> bool {
        self.config.should_use_colours()
    }

    pub fn config(&self) -> &ColourConfig {
        &self.config
    }

    pub fn palette(&self) -> &ColourPalette {
        &self.palette
    }

    pub fn header(&self, text: &str) -> ColoredString {
        let painted = self.paint(text, &self.palette.header);
        if self.colours_enabled() {
            painted.bold()
        } else {
            painted
        }
    }

    pub fn score(&self, text: &str) -> ColoredString {
        self.paint(text, &self.palette.score)
    }

    pub fn path(&self, text: &str) -> ColoredString {
        self.paint(text, &self.palette.path)
    }

    pub fn count(&self, text: &str) -> ColoredString {
        self.paint(text, &self.palette.count)
    }

    pub fn warning(&self, text: &str) -> ColoredString {
        self.paint(text, &self.palette.warning)
    }

    fn paint(&self, text: &str, color_name: &str) -> ColoredString {
        if !self.colours_enabled() {
            return text.normal().clear();
        }
        match ColourPalette::parse_color(color_name) {
            Some(color) => text.color(color),
            None => text.normal(),
        }
    }
}

impl Default for ColourManager {
    fn default() -> Self {
        Self::new()
    }
}
