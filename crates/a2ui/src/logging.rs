//! Log setup for terminal hosts.
//!
//! A full-screen terminal owns stdout, so log output goes to a file. Library
//! code only emits `tracing` events; installing a subscriber is up to the
//! binary, usually through [`log_to_file`].

use crate::viewer::ViewerError;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset or invalid.
pub const DEFAULT_FILTER: &str = "info";

/// Install a global `tracing` subscriber appending to `path`.
///
/// The filter comes from `RUST_LOG` and falls back to [`DEFAULT_FILTER`].
/// Fails if the file cannot be opened or a global subscriber is already set.
///
/// # Example
///
/// ```no_run
/// a2ui::logging::log_to_file("a2ui.log").unwrap();
/// tracing::info!("viewer starting");
/// ```
pub fn log_to_file(path: impl AsRef<Path>) -> Result<(), ViewerError> {
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_target(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(ViewerError::Logging)
}
