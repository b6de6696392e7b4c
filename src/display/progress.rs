//! Progress indicator for the change extraction pass
//!
//! Prints a status line when extraction starts and one mark per diffed
//! commit, all on stderr so report output on stdout stays clean.

use std::io::Write;
use parking_lot::Mutex;

use crate::display::ColourManager;
use crate::hotspot::ExtractionProgress;

/// Status indicator symbols with unicode support
#[derive(Debug, Clone)]
pub struct StatusSymbols {
    pub info: &'static str,
    pub tick: &'static str,
}

impl Default for StatusSymbols {
    fn default() -> Self {
        Self {
            info: "ℹ️",
            tick: "·",
        }
    }
}

impl StatusSymbols {
    /// ASCII-only symbols for terminals without unicode support
    pub fn ascii() -> Self {
        Self {
            info: "[INFO]",
            tick: ".",
        }
    }
}

/// Writes extraction progress to a stream, stderr by default
pub struct ProgressIndicator {
    colour_manager: ColourManager,
    symbols: StatusSymbols,
    out: Mutex<Box<dyn Write + Send>>,
}

impl ProgressIndicator {
    pub fn new(colour_manager: ColourManager) -> Self {
        Self::with_writer(colour_manager, Box::new(std::io::stderr()))
    }

    pub fn with_writer(colour_manager: ColourManager, out: Box<dyn Write + Send>) -> Self {
        let symbols = if Self::supports_unicode() { StatusSymbols::default() } else { StatusSymbols::ascii() };
        Self {
            colour_manager,
            symbols,
            out: Mutex::new(out),
        }
    }

    pub fn with_symbols(mut self, symbols: StatusSymbols) -> Self {
        self.symbols = symbols;
        self
    }

    fn supports_unicode() -> bool {
        ["LC_ALL", "LC_CTYPE", "LANG"]
            .iter()
            .filter_map(|name| std::env::var(name).ok())
            .find(|value| !value.is_empty())
            .map(|value| {
                let value = value.to_lowercase();
                value.contains("utf-8") || value.contains("utf8")
            })
            .unwrap_or(false)
    }

    // progress output is best effort; a closed stderr must not fail the run
    fn emit(&self, text: &str) {
        let mut out = self.out.lock();
        let _ = out.write_all(text.as_bytes());
        let _ = out.flush();
    }
}

impl ExtractionProgress for ProgressIndicator {
    fn started(&self, total: usize) {
        let message = format!("Extracting changes from {} commits ", total);
        self.emit(&format!("{} {}", self.symbols.info, self.colour_manager.header(&message)));
    }

    fn commit_done(&self, _commit_id: &str) {
        self.emit(self.symbols.tick);
    }

    fn finished(&self) {
        self.emit("\n");
    }
}
