//! Mirror configuration
//!
//! Settings come from an optional config file (any format
//! [`mirror_fs::ConfigStore`] understands) and may be overridden from the
//! command line.

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use mirror_fs::{ConfigStore, ContentComparator, DigestComparator, TimestampComparator};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Default pause between two passes.
pub const DEFAULT_INTERVAL_SECONDS: u64 = 60;

/// How an existing replica file is tested against its source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompareMode {
    /// Full-content digest
    #[default]
    Digest,
    /// Last-modified timestamp
    Mtime,
}

impl CompareMode {
    pub fn comparator(self) -> Box<dyn ContentComparator> {
        match self {
            Self::Digest => Box::new(DigestComparator),
            Self::Mtime => Box::new(TimestampComparator),
        }
    }
}

impl FromStr for CompareMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "digest" => Ok(Self::Digest),
            "mtime" => Ok(Self::Mtime),
            _ => Err(Error::invalid_config(format!(
                "unknown compare mode '{}', expected 'digest' or 'mtime'",
                s
            ))),
        }
    }
}

/// What a pass does when a single entry fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorPolicy {
    /// Abandon the rest of the pass
    #[default]
    Abort,
    /// Record the failure and move on to the next entry
    Continue,
}

/// Configuration for the mirror scheduler and reconciler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MirrorConfig {
    /// Pause between the end of one pass and the start of the next
    pub interval_seconds: u64,
    /// Change detection strategy
    pub compare: CompareMode,
    /// Per-entry failure handling
    pub on_error: ErrorPolicy,
    /// Create replica directories for source directories that hold no files
    pub mirror_empty_dirs: bool,
}

impl Default for MirrorConfig {
    fn default() -> Self {
        Self {
            interval_seconds: DEFAULT_INTERVAL_SECONDS,
            compare: CompareMode::default(),
            on_error: ErrorPolicy::default(),
            mirror_empty_dirs: true,
        }
    }
}

impl MirrorConfig {
    /// Load configuration from a file and validate it.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if a value
    /// is out of range.
    pub fn load(path: &Path) -> Result<Self> {
        let config: Self = ConfigStore::new()
            .load(path)
            .map_err(|e| Error::invalid_config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the scheduler cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.interval_seconds == 0 {
            return Err(Error::invalid_config("interval_seconds must be at least 1"));
        }
        Ok(())
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_seconds)
    }
}

/// Reject source/replica combinations that cannot converge.
///
/// Identical roots, or one root nested inside the other, would make each
/// pass copy or delete its own output. Paths are compared after
/// canonicalization; a root that does not exist yet is made absolute
/// instead.
pub fn validate_roots(source: &Path, replica: &Path) -> Result<()> {
    let source = resolve_root(source);
    let replica = resolve_root(replica);

    if source == replica {
        return Err(Error::invalid_config(format!(
            "source and replica are the same folder: {}",
            source.display()
        )));
    }
    if replica.starts_with(&source) {
        return Err(Error::invalid_config(format!(
            "replica {} is inside source {}",
            replica.display(),
            source.display()
        )));
    }
    if source.starts_with(&replica) {
        return Err(Error::invalid_config(format!(
            "source {} is inside replica {}",
            source.display(),
            replica.display()
        )));
    }
    Ok(())
}

fn resolve_root(path: &Path) -> PathBuf {
    dunce::canonicalize(path)
        .or_else(|_| std::path::absolute(path))
        .unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn defaults_match_baseline() {
        let config = MirrorConfig::default();
        assert_eq!(config.interval(), Duration::from_secs(60));
        assert_eq!(config.compare, CompareMode::Digest);
        assert_eq!(config.on_error, ErrorPolicy::Abort);
        assert!(config.mirror_empty_dirs);
    }

    #[test]
    fn zero_interval_is_rejected() {
        let config = MirrorConfig {
            interval_seconds: 0,
            ..MirrorConfig::default()
        };
        assert!(config.validate().unwrap_err().is_configuration());
    }

    #[test]
    fn compare_mode_parses_case_insensitively() {
        assert_eq!("MTIME".parse::<CompareMode>().unwrap(), CompareMode::Mtime);
        assert!("size".parse::<CompareMode>().is_err());
    }

    #[test]
    fn nested_roots_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let base = dunce::canonicalize(dir.path()).unwrap();
        let source = base.join("source");
        fs::create_dir(&source).unwrap();

        assert!(validate_roots(&source, &source).is_err());
        assert!(validate_roots(&source, &source.join("replica")).is_err());
        assert!(validate_roots(&source.join("inner"), &source).is_err());
        assert!(validate_roots(&source, &base.join("replica")).is_ok());
    }

    #[test]
    fn sibling_with_common_prefix_is_accepted() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("data");
        let replica = dir.path().join("data-replica");
        fs::create_dir(&source).unwrap();

        assert!(validate_roots(&source, &replica).is_ok());
    }
}
