//! Filesystem layer for folder-mirror
//!
//! Provides root-relative tree paths, content digests for change detection,
//! recursive tree walking and crash-safe copy operations.

pub mod config;
pub mod digest;
pub mod error;
pub mod io;
pub mod path;
pub mod walk;

pub use config::ConfigStore;
pub use digest::{ContentComparator, ContentDigest, DigestComparator, TimestampComparator};
pub use error::{Error, Result};
pub use path::TreePath;
pub use walk::{EntryKind, TreeEntry, walk_tree};
