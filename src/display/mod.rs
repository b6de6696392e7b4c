//! Display module for colour management, progress and report rendering

pub mod colours;
pub mod config;
pub mod progress;
pub mod report;

pub use colours::ColourManager;
pub use config::{ColourConfig, ColourPalette, ColourTheme};
pub use progress::{ProgressIndicator, StatusSymbols};
pub use report::{render_report, ReportFormat};
