//! Structured logging for the forum backend.
//!
//! Components log through `tracing` macros with key/value fields
//! (`identity_id`, `post_id`, `reference`, ...). This module installs the
//! global subscriber that renders them.

use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Arc;

use tracing::{info, Level};
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;
use crate::{ForumError, Result};

/// Resolve a configured level name. Unknown names fall back to INFO.
fn parse_level(level: &str) -> Level {
    let level = level.trim();
    if level.eq_ignore_ascii_case("warning") {
        return Level::WARN;
    }
    level.parse().unwrap_or(Level::INFO)
}

/// `RUST_LOG` directives take precedence; the configured level is the floor.
fn build_filter(level: Level) -> EnvFilter {
    EnvFilter::from_default_env().add_directive(level.into())
}

/// Install the global subscriber, writing to stdout and appending to the
/// configured log file.
pub fn init(config: &LoggingConfig) -> Result<()> {
    let level = parse_level(&config.level);
    let path = Path::new(&config.file);

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let log_file = OpenOptions::new().create(true).append(true).open(path)?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stdout.and(Arc::new(log_file)))
                .with_ansi(false)
                .with_target(true),
        )
        .with(build_filter(level))
        .try_init()
        .map_err(|e| ForumError::Config(format!("logging already initialized: {e}")))?;

    info!(level = %level, file = %path.display(), "Logging initialized");
    Ok(())
}

/// Console-only logging, used when the log file cannot be opened.
pub fn init_console_only(level: &str) {
    let level = parse_level(level);
    let installed = tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .with(build_filter(level))
        .try_init();

    if installed.is_ok() {
        info!(level = %level, "Console logging initialized");
    }
}
