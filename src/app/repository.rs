//! Repository path resolution

use anyhow::{Context, Result};
use std::path::PathBuf;
use log::debug;

/// Resolve the repository argument, expanding `~`; the current directory when absent
///
/// Existence and git validity are checked when the repository is opened.
pub fn resolve_repository_path(repository_arg: Option<&str>) -> Result<PathBuf> {
    match repository_arg {
        Some(path) => {
            debug!("Repository path provided: {}", path);
            let expanded_path = match (path.strip_prefix('~'), dirs::home_dir()) {
                (Some(rest), Some(home_dir)) => home_dir.join(rest.trim_start_matches('/')),
                _ => PathBuf::from(path),
            };

            Ok(expanded_path.canonicalize().unwrap_or(expanded_path))
        }
        None => {
            debug!("No repository path provided, using current directory");
            std::env::current_dir()
                .context("Failed to get current directory")
        }
    }
}
