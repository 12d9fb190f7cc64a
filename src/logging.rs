//! tracing setup.
//!
//! Events go to stdout and, when the log file can be opened, to that file as
//! well. `RUST_LOG` directives are honoured on top of the configured level.

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::Path;
use std::sync::Arc;

use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;
use crate::Result;

/// Map a config level name onto a filter. Unknown names mean `info`.
fn level_filter(level: &str) -> LevelFilter {
    match level.trim() {
        "" => LevelFilter::INFO,
        l if l.eq_ignore_ascii_case("warning") => LevelFilter::WARN,
        l => l.parse().unwrap_or(LevelFilter::INFO),
    }
}

fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::from_default_env().add_directive(level_filter(level).into())
}

/// Open `path` for appending, creating missing parent directories.
fn open_log_file(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// Install the global subscriber writing to stdout and `config.file`.
///
/// Fails if the log file cannot be opened; callers fall back to
/// [`init_console_only`].
pub fn init(config: &LoggingConfig) -> Result<()> {
    let file = Arc::new(open_log_file(Path::new(&config.file))?);

    let layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stdout.and(file))
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(layer)
        .with(env_filter(&config.level))
        .init();

    Ok(())
}

/// Install a stdout-only subscriber.
pub fn init_console_only(level: &str) {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(env_filter(level))
        .init();
}
