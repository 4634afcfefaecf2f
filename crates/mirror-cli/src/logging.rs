//! Dual console and file logging
//!
//! Every line goes to stdout and is appended to the log file in the form
//! `<timestamp> - <message>`.

use std::fs::OpenOptions;
use std::io::IsTerminal;
use std::path::Path;

use chrono::Local;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::filter::{FilterExt, LevelFilter, Targets};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::error::{CliError, Result};

/// Local wall-clock timestamp followed by the ` - ` separator.
///
/// The formatter inserts a single space after the timer output.
#[derive(Debug, Clone, Copy, Default)]
pub struct LineTimer;

impl FormatTime for LineTimer {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        write!(w, "{} -", Local::now().format("%Y-%m-%d %H:%M:%S"))
    }
}

/// Target whose info lines (pass markers and one line per event) are kept
/// whatever `RUST_LOG` says.
const PASS_LOG_TARGET: &str = "mirror_core";

/// Create the log file if it does not exist, then install the subscriber.
///
/// Uses `RUST_LOG` when set, otherwise `info` (`debug` when verbose). Pass
/// and event lines from [`PASS_LOG_TARGET`] are never filtered below info.
pub fn init(log_file: &Path, verbose: bool) -> Result<()> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)
        .map_err(|source| CliError::LogFile {
            path: log_file.to_path_buf(),
            source,
        })?;

    let file_name = log_file
        .file_name()
        .ok_or_else(|| CliError::user(format!("Log file path has no file name: {}", log_file.display())))?;
    let directory = log_file
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name.to_string_lossy())
        .build(directory)
        .map_err(|e| CliError::Logging {
            message: e.to_string(),
        })?;

    let pass_log = Targets::new().with_target(PASS_LOG_TARGET, LevelFilter::INFO);

    let console_layer = fmt::layer()
        .with_timer(LineTimer)
        .with_level(false)
        .with_target(false)
        .with_ansi(std::io::stdout().is_terminal())
        .with_filter(env_filter(verbose)?.or(pass_log.clone()));

    let file_layer = fmt::layer()
        .with_writer(appender)
        .with_timer(LineTimer)
        .with_level(false)
        .with_target(false)
        .with_ansi(false)
        .with_filter(env_filter(verbose)?.or(pass_log));

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| CliError::Logging {
            message: e.to_string(),
        })?;

    tracing::debug!(log_file = %log_file.display(), "Logging initialised");
    Ok(())
}

fn env_filter(verbose: bool) -> Result<EnvFilter> {
    let default_level = if verbose { "debug" } else { "info" };
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .map_err(|e| CliError::Logging {
            message: e.to_string(),
        })
}
