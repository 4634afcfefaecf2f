//! Error types for mirror-core

use std::path::PathBuf;

use mirror_fs::TreePath;

use crate::sync::Phase;

/// Result type for mirror-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in mirror-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Source root is absent or not a directory
    #[error("Source folder not found: {path}")]
    SourceMissing { path: PathBuf },

    /// Replica root exists but is not a directory
    #[error("Replica path is not a directory: {path}")]
    ReplicaNotDirectory { path: PathBuf },

    /// Rejected settings or root combination
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// An entry could not be processed; the rest of the pass was abandoned
    #[error("Synchronization failed during {phase} at {path}: {source}")]
    Synchronization {
        phase: Phase,
        path: TreePath,
        #[source]
        source: mirror_fs::Error,
    },

    /// The pass stopped at a safe point because shutdown was requested
    #[error("Synchronization cancelled")]
    Cancelled,

    /// The worker running the pass panicked or was lost
    #[error("Synchronization worker failed: {message}")]
    Worker { message: String },

    // Transparent wrappers for underlying crate errors
    /// Filesystem error from mirror-fs
    #[error(transparent)]
    Fs(#[from] mirror_fs::Error),
}

impl Error {
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Whether this error should stop the program rather than a single pass.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::InvalidConfig { .. })
    }
}
