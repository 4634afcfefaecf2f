//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::Parser;
use mirror_core::{CompareMode, ErrorPolicy, MirrorConfig};

use crate::error::Result;

/// Folder Mirror - Keep a replica folder identical to a source folder
///
/// Every interval the replica is brought in line with the source: entries
/// missing from the source are deleted, new and changed files are copied.
#[derive(Parser, Debug)]
#[command(name = "mirror")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Folder to mirror from
    pub source: PathBuf,

    /// Folder kept identical to the source
    pub replica: PathBuf,

    /// Log file, created if missing and appended to
    pub log_file: PathBuf,

    /// Seconds between passes [default: 60]
    #[arg(short, long, env = "MIRROR_INTERVAL")]
    pub interval: Option<u64>,

    /// Config file (.toml, .json, .yaml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Change detection: "digest" (content) or "mtime" (timestamp)
    #[arg(long)]
    pub compare: Option<CompareMode>,

    /// Keep going when a single entry fails instead of abandoning the pass
    #[arg(long)]
    pub continue_on_error: bool,

    /// Do not create replica folders for empty source folders
    #[arg(long)]
    pub no_empty_dirs: bool,

    /// Run a single pass and exit
    #[arg(long)]
    pub once: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Build the effective configuration: config file first, then flags.
    pub fn mirror_config(&self) -> Result<MirrorConfig> {
        let mut config = match &self.config {
            Some(path) => MirrorConfig::load(path)?,
            None => MirrorConfig::default(),
        };

        if let Some(interval) = self.interval {
            config.interval_seconds = interval;
        }
        if let Some(compare) = self.compare {
            config.compare = compare;
        }
        if self.continue_on_error {
            config.on_error = ErrorPolicy::Continue;
        }
        if self.no_empty_dirs {
            config.mirror_empty_dirs = false;
        }

        config.validate()?;
        Ok(config)
    }
}
