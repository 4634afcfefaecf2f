//! Root-relative path handling
//!
//! A [`TreePath`] is the identity key that correlates an entry in the source
//! tree with the entry at the same position in the replica tree.

use std::path::{Component, Path, PathBuf};

use serde::Serialize;

/// A path relative to a tree root, normalized to forward slashes.
///
/// Normalization happens once at construction so that equality is plain
/// string equality: backslashes become `/`, empty and `.` components are
/// dropped, `..` consumes the preceding component (and never climbs above
/// the root), and no leading or trailing separator is kept. Comparison is
/// case-sensitive on every platform.
///
/// The empty path denotes the root itself.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct TreePath {
    inner: String,
}

impl TreePath {
    /// Create a TreePath from any relative path-like input.
    pub fn new(path: impl AsRef<Path>) -> Self {
        let raw = path.as_ref().to_string_lossy().replace('\\', "/");
        let mut segments: Vec<&str> = Vec::new();
        for segment in raw.split('/') {
            match segment {
                "" | "." => {}
                ".." => {
                    segments.pop();
                }
                _ => segments.push(segment),
            }
        }
        Self {
            inner: segments.join("/"),
        }
    }

    /// The root of a tree.
    pub fn root() -> Self {
        Self {
            inner: String::new(),
        }
    }

    /// Compute the path of `full` relative to `root`.
    ///
    /// Components are taken verbatim from the filesystem. Returns `None`
    /// when `full` does not live under `root` or when the remainder contains
    /// `..` or a root/prefix component.
    pub fn relative_to(root: &Path, full: &Path) -> Option<Self> {
        let rest = full.strip_prefix(root).ok()?;
        let mut segments = Vec::new();
        for component in rest.components() {
            match component {
                Component::Normal(part) => segments.push(part.to_string_lossy().into_owned()),
                Component::CurDir => {}
                Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
            }
        }
        Some(Self {
            inner: segments.join("/"),
        })
    }

    /// Get the internal normalized string representation.
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Whether this path denotes the tree root.
    pub fn is_root(&self) -> bool {
        self.inner.is_empty()
    }

    /// Resolve this path under `root` as a platform-native path.
    pub fn resolve(&self, root: &Path) -> PathBuf {
        let mut native = root.to_path_buf();
        for segment in self.segments() {
            native.push(segment);
        }
        native
    }

    fn segments(&self) -> impl Iterator<Item = &str> {
        self.inner.split('/').filter(|s| !s.is_empty())
    }
}

impl std::fmt::Display for TreePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_root() {
            write!(f, ".")
        } else {
            write!(f, "{}", self.inner)
        }
    }
}
