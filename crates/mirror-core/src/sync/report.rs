//! Pass results

use chrono::{DateTime, Utc};
use mirror_fs::TreePath;
use serde::Serialize;

use super::event::{SyncEvent, SyncEventKind};
use crate::Error;

/// The two strictly ordered phases of a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Removal of replica entries with no source counterpart
    Prune,
    /// Creation and update of replica entries from the source
    Copy,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Prune => f.write_str("prune"),
            Self::Copy => f.write_str("copy"),
        }
    }
}

/// An entry that failed while the pass kept going.
#[derive(Debug, Clone, Serialize)]
pub struct EntryFailure {
    pub phase: Phase,
    pub path: TreePath,
    pub message: String,
}

/// Everything a finished pass did.
#[derive(Debug, Clone, Serialize)]
pub struct PassReport {
    /// Completed actions, in the order they happened
    pub events: Vec<SyncEvent>,
    /// Entries skipped after an error (only under the `continue` policy)
    pub failures: Vec<EntryFailure>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl PassReport {
    pub(crate) fn new(started_at: DateTime<Utc>) -> Self {
        Self {
            events: Vec::new(),
            failures: Vec::new(),
            started_at,
            finished_at: started_at,
        }
    }

    /// Number of events of the given kind.
    pub fn count(&self, kind: SyncEventKind) -> usize {
        self.events.iter().filter(|e| e.kind() == kind).count()
    }

    /// True when the replica was already in sync and nothing failed.
    pub fn is_clean(&self) -> bool {
        self.events.is_empty() && self.failures.is_empty()
    }

    pub fn summary(&self) -> String {
        let mut summary = format!(
            "{} copied, {} updated, {} deleted",
            self.count(SyncEventKind::Copied),
            self.count(SyncEventKind::Updated),
            self.count(SyncEventKind::Deleted)
        );
        if !self.failures.is_empty() {
            summary.push_str(&format!(", {} failed", self.failures.len()));
        }
        summary
    }
}

/// How a pass ended.
#[derive(Debug)]
pub enum PassOutcome {
    Completed(PassReport),
    Failed(Error),
    Cancelled,
}

impl PassOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed(_))
            || matches!(self, Self::Completed(report) if !report.failures.is_empty())
    }
}

impl From<crate::Result<PassReport>> for PassOutcome {
    fn from(result: crate::Result<PassReport>) -> Self {
        match result {
            Ok(report) => Self::Completed(report),
            Err(Error::Cancelled) => Self::Cancelled,
            Err(e) => Self::Failed(e),
        }
    }
}
