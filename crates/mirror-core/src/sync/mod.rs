//! One-way synchronization of a replica tree from a source tree
//!
//! This module provides:
//! - **reconciler**: the two-phase pass (prune orphans, then copy/update)
//! - **event**: the record of each action a pass takes, and sinks for them
//! - **report**: per-pass results and the outcome type the scheduler logs

mod event;
mod reconciler;
mod report;

pub use event::{EventSink, SyncEvent, SyncEventKind, TracingSink};
pub use reconciler::{AttributeCopier, TreeReconciler};
pub use report::{EntryFailure, PassOutcome, PassReport, Phase};
