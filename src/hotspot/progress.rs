//! Progress reporting for change extraction

/// Receives notifications while the first pass walks the window
///
/// Calls may arrive from several worker threads at once.
pub trait ExtractionProgress: Send + Sync {
    /// Extraction is about to start for `total` commits
    fn started(&self, _total: usize) {}

    /// One commit has been diffed, successfully or not
    fn commit_done(&self, _commit_id: &str) {}

    /// All commits have been visited
    fn finished(&self) {}
}

/// Reports nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentProgress;

impl ExtractionProgress for SilentProgress {}
