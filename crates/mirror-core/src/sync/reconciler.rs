//! TreeReconciler implementation
//!
//! A pass runs two phases with a full barrier between them. Prune removes
//! every replica entry whose relative path has no counterpart of the same
//! kind in the source, deepest entries first. Copy then walks the source,
//! creating directories and copying new or changed files. Pruning first
//! frees any path whose kind changed between file and directory before the
//! copy phase needs it.

use std::path::Path;

use chrono::Utc;
use mirror_fs::walk::{self, EntryKind, TreeEntry};
use mirror_fs::{ContentComparator, TreePath, io};

use super::event::{EventSink, SyncEvent, SyncEventKind};
use super::report::{EntryFailure, PassReport, Phase};
use crate::cancel::CancelToken;
use crate::config::{ErrorPolicy, MirrorConfig};
use crate::{Error, Result};

/// Propagates metadata from a source file onto its freshly written replica.
pub type AttributeCopier = fn(&Path, &Path) -> mirror_fs::Result<()>;

/// Reconciles a replica tree against a source tree, one pass at a time.
///
/// Holds no state between passes: every call to
/// [`synchronize`](Self::synchronize) re-walks both trees from scratch.
pub struct TreeReconciler {
    comparator: Box<dyn ContentComparator>,
    policy: ErrorPolicy,
    mirror_empty_dirs: bool,
    copy_attributes: AttributeCopier,
    cancel: CancelToken,
}

impl TreeReconciler {
    pub fn new(config: &MirrorConfig) -> Self {
        Self {
            comparator: config.compare.comparator(),
            policy: config.on_error,
            mirror_empty_dirs: config.mirror_empty_dirs,
            copy_attributes: io::copy_attributes,
            cancel: CancelToken::new(),
        }
    }

    /// Replace the change-detection strategy.
    pub fn with_comparator(mut self, comparator: Box<dyn ContentComparator>) -> Self {
        self.comparator = comparator;
        self
    }

    /// Replace how timestamps and permissions are carried to the replica.
    /// Failures are logged and never fail the entry.
    pub fn with_attribute_copier(mut self, copier: AttributeCopier) -> Self {
        self.copy_attributes = copier;
        self
    }

    /// Share a cancellation token with the caller.
    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn cancel_token(&self) -> &CancelToken {
        &self.cancel
    }

    /// Run one synchronization pass.
    ///
    /// Each completed action is handed to `sink` immediately, so events
    /// emitted before a failure are not lost.
    ///
    /// # Errors
    ///
    /// - [`Error::SourceMissing`] / [`Error::ReplicaNotDirectory`] when a root
    ///   is unusable
    /// - [`Error::Synchronization`] for the first failing entry under the
    ///   `abort` policy; earlier actions are not rolled back
    /// - [`Error::Cancelled`] when cancellation was requested; checked before
    ///   each phase and between entries, never during a copy
    pub fn synchronize(
        &self,
        source: &Path,
        replica: &Path,
        sink: &mut dyn EventSink,
    ) -> Result<PassReport> {
        let started_at = Utc::now();
        self.checkpoint()?;
        self.prepare_roots(source, replica)?;

        let mut pass = Pass {
            reconciler: self,
            source,
            replica,
            sink,
            report: PassReport::new(started_at),
        };

        pass.prune()?;
        self.checkpoint()?;
        pass.copy()?;

        let mut report = pass.report;
        report.finished_at = Utc::now();
        Ok(report)
    }

    fn checkpoint(&self) -> Result<()> {
        if self.cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }
        Ok(())
    }

    fn prepare_roots(&self, source: &Path, replica: &Path) -> Result<()> {
        if !source.is_dir() {
            return Err(Error::SourceMissing {
                path: source.to_path_buf(),
            });
        }
        if replica.exists() && !replica.is_dir() {
            return Err(Error::ReplicaNotDirectory {
                path: replica.to_path_buf(),
            });
        }
        if io::ensure_dir(replica)? {
            tracing::info!("Created replica folder {}", replica.display());
        }
        Ok(())
    }
}

/// Working state of a single pass.
struct Pass<'a> {
    reconciler: &'a TreeReconciler,
    source: &'a Path,
    replica: &'a Path,
    sink: &'a mut dyn EventSink,
    report: PassReport,
}

impl Pass<'_> {
    fn prune(&mut self) -> Result<()> {
        let entries = walk::walk_tree(self.replica).map_err(|source| Error::Synchronization {
            phase: Phase::Prune,
            path: TreePath::root(),
            source,
        })?;

        // Pre-order reversed: every child is visited before its parent.
        for entry in entries.iter().rev() {
            self.reconciler.checkpoint()?;
            let result = self.prune_entry(entry);
            self.settle(Phase::Prune, &entry.path, result)?;
        }
        Ok(())
    }

    fn prune_entry(&mut self, entry: &TreeEntry) -> mirror_fs::Result<()> {
        let counterpart = walk::entry_kind(&entry.path.resolve(self.source))?;
        if is_counterpart(counterpart, entry.kind) {
            return Ok(());
        }

        io::remove_entry(&entry.path.resolve(self.replica), entry.kind)?;
        self.emit(SyncEventKind::Deleted, &entry.path);
        Ok(())
    }

    fn copy(&mut self) -> Result<()> {
        let entries = walk::walk_tree(self.source).map_err(|source| Error::Synchronization {
            phase: Phase::Copy,
            path: TreePath::root(),
            source,
        })?;

        for entry in &entries {
            self.reconciler.checkpoint()?;
            let result = match entry.kind {
                EntryKind::Directory => self.mirror_dir(&entry.path),
                EntryKind::File => self.copy_file(&entry.path),
                EntryKind::Symlink => {
                    tracing::debug!(path = %entry.path, "Skipping symlink");
                    Ok(())
                }
            };
            self.settle(Phase::Copy, &entry.path, result)?;
        }
        Ok(())
    }

    fn mirror_dir(&mut self, path: &TreePath) -> mirror_fs::Result<()> {
        if !self.reconciler.mirror_empty_dirs {
            return Ok(());
        }
        if io::ensure_dir(&path.resolve(self.replica))? {
            tracing::debug!(path = %path, "Created directory");
        }
        Ok(())
    }

    fn copy_file(&mut self, path: &TreePath) -> mirror_fs::Result<()> {
        let source_path = path.resolve(self.source);
        let replica_path = path.resolve(self.replica);

        let kind = match walk::entry_kind(&replica_path)? {
            None => SyncEventKind::Copied,
            // The rename in copy_atomic replaces the link itself.
            Some(EntryKind::Symlink) => SyncEventKind::Updated,
            Some(_) => {
                if self
                    .reconciler
                    .comparator
                    .content_equals(&source_path, &replica_path)?
                {
                    return Ok(());
                }
                SyncEventKind::Updated
            }
        };

        let bytes = io::copy_atomic(&source_path, &replica_path)?;
        if let Err(e) = (self.reconciler.copy_attributes)(&source_path, &replica_path) {
            tracing::warn!(path = %path, error = %e, "Failed to copy file attributes");
        }
        tracing::debug!(
            path = %path,
            bytes,
            comparator = self.reconciler.comparator.name(),
            "Wrote replica file"
        );

        self.emit(kind, path);
        Ok(())
    }

    fn emit(&mut self, kind: SyncEventKind, path: &TreePath) {
        let event = SyncEvent::now(kind, path.clone());
        self.sink.record(&event);
        self.report.events.push(event);
    }

    /// Apply the error policy to the outcome of one entry.
    fn settle(&mut self, phase: Phase, path: &TreePath, result: mirror_fs::Result<()>) -> Result<()> {
        let Err(source) = result else {
            return Ok(());
        };

        match self.reconciler.policy {
            ErrorPolicy::Abort => Err(Error::Synchronization {
                phase,
                path: path.clone(),
                source,
            }),
            ErrorPolicy::Continue => {
                tracing::warn!(%phase, path = %path, error = %source, "Skipping entry");
                self.report.failures.push(EntryFailure {
                    phase,
                    path: path.clone(),
                    message: source.to_string(),
                });
                Ok(())
            }
        }
    }
}

/// Whether a source entry of kind `source` keeps a replica entry of kind
/// `replica` alive. Kinds must match exactly, so a replica symlink standing
/// where the source has a file is pruned and the file recopied.
fn is_counterpart(source: Option<EntryKind>, replica: EntryKind) -> bool {
    source == Some(replica)
}
