//! Reconciliation engine for folder-mirror
//!
//! This crate keeps a replica directory tree identical to a source tree:
//!
//! - **TreeReconciler**: one synchronization pass, pruning orphaned replica
//!   entries and then copying new or changed source files
//! - **Scheduler**: runs passes back to back with a fixed pause, until a
//!   [`CancelToken`] asks it to stop
//! - **MirrorConfig**: polling cadence and change-detection settings
//!
//! # Architecture
//!
//! ```text
//!          mirror-cli
//!              |
//!         mirror-core
//!   (Scheduler -> TreeReconciler)
//!              |
//!          mirror-fs
//!   (walk, digest, atomic copy)
//! ```

pub mod cancel;
pub mod config;
pub mod error;
pub mod scheduler;
pub mod sync;

pub use cancel::CancelToken;
pub use config::{CompareMode, ErrorPolicy, MirrorConfig, validate_roots};
pub use error::{Error, Result};
pub use scheduler::Scheduler;
pub use sync::{
    EntryFailure, EventSink, PassOutcome, PassReport, Phase, SyncEvent, SyncEventKind,
    TracingSink, TreeReconciler,
};
