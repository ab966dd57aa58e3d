//! Logging setup
//!
//! Library code logs through the `log` facade. Binaries pick a sink here:
//! the terminal UI owns the screen, so it writes to a file next to the
//! executable; one-shot commands log warnings to stderr.

use crate::error::{DashtableError, Result};
use simplelog::{ColorChoice, ConfigBuilder, LevelFilter, TermLogger, TerminalMode, WriteLogger};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

const LOG_FILE_NAME: &str = "dashtable.log";

/// Default log file path (same directory as executable)
pub fn default_log_path() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."))
        .join(LOG_FILE_NAME)
}

fn config() -> simplelog::Config {
    ConfigBuilder::new()
        .set_target_level(LevelFilter::Error)
        .set_thread_level(LevelFilter::Off)
        .build()
}

/// Log to a file, truncated at startup.
pub fn init_file(path: Option<&Path>, level: LevelFilter) -> Result<PathBuf> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_log_path);
    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(&path)?;

    WriteLogger::init(level, config(), file)
        .map_err(|e| DashtableError::LoggerError(e.to_string()))?;
    log::info!("dashtable {} logging to {}", crate::VERSION, path.display());
    Ok(path)
}

/// Log to stderr.
pub fn init_stderr(level: LevelFilter) -> Result<()> {
    TermLogger::init(level, config(), TerminalMode::Stderr, ColorChoice::Auto)
        .map_err(|e| DashtableError::LoggerError(e.to_string()))
}
