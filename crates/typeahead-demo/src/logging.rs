#![forbid(unsafe_code)]

//! Log file setup.
//!
//! The terminal belongs to the UI, so logs never go to stdout or stderr.
//! With a log file configured, a `fmt` subscriber writes plain lines there,
//! filtered by `TYPEAHEAD_LOG` (default `info`).

use std::fs::OpenOptions;
use std::io;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

/// Environment variable holding filter directives.
pub const LOG_ENV: &str = "TYPEAHEAD_LOG";

const DEFAULT_FILTER: &str = "info";

/// Filter from `TYPEAHEAD_LOG`, or `info` when unset or invalid.
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global subscriber writing to `path`. Does nothing without a
/// path.
pub fn init(path: Option<&Path>) -> io::Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| io::Error::new(e.kind(), format!("{}: {e}", path.display())))?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .map_err(io::Error::other)?;

    tracing::info!(log_file = %path.display(), "logging started");
    Ok(())
}
