//! [`TestTree`] builder for mirroring scenarios.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary directory tree with helpers for setup and assertion.
///
/// Paths passed to the helpers are relative to the tree root and use `/`
/// as separator on every platform.
///
/// # Example
///
/// ```rust,no_run
/// use mirror_test_utils::TestTree;
///
/// let source = TestTree::new();
/// source.write("a.txt", "hello").write("sub/b.txt", "world");
/// assert_eq!(source.read("sub/b.txt"), "world");
/// ```
pub struct TestTree {
    temp_dir: TempDir,
}

impl Default for TestTree {
    fn default() -> Self {
        Self::new()
    }
}

impl TestTree {
    /// Create an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    /// Return the root path of the temporary directory.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Resolve a relative path under the root.
    pub fn path(&self, rel: &str) -> PathBuf {
        rel.split('/')
            .filter(|s| !s.is_empty())
            .fold(self.root().to_path_buf(), |acc, s| acc.join(s))
    }

    /// Write a file, creating parent directories as needed.
    pub fn write(&self, rel: &str, content: &str) -> &Self {
        let path = self.path(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .unwrap_or_else(|e| panic!("TestTree::write: failed to create {}: {e}", parent.display()));
        }
        fs::write(&path, content)
            .unwrap_or_else(|e| panic!("TestTree::write: failed to write {}: {e}", path.display()));
        self
    }

    /// Create a directory chain.
    pub fn mkdir(&self, rel: &str) -> &Self {
        let path = self.path(rel);
        fs::create_dir_all(&path)
            .unwrap_or_else(|e| panic!("TestTree::mkdir: failed to create {}: {e}", path.display()));
        self
    }

    /// Remove a file or a whole directory.
    pub fn remove(&self, rel: &str) -> &Self {
        let path = self.path(rel);
        let result = if path.is_dir() {
            fs::remove_dir_all(&path)
        } else {
            fs::remove_file(&path)
        };
        result.unwrap_or_else(|e| panic!("TestTree::remove: failed to remove {}: {e}", path.display()));
        self
    }

    /// Read a file as UTF-8.
    ///
    /// # Panics
    /// Panics if the file cannot be read.
    pub fn read(&self, rel: &str) -> String {
        let path = self.path(rel);
        fs::read_to_string(&path)
            .unwrap_or_else(|_| panic!("Could not read file: {}", path.display()))
    }

    /// Every entry below the root, as sorted relative paths.
    ///
    /// Directories are listed with the same syntax as files, so two trees
    /// with equal path sets have identical structure.
    pub fn paths(&self) -> BTreeSet<String> {
        let mut paths = BTreeSet::new();
        collect(self.root(), "", &mut paths);
        paths
    }

    /// Assert that `rel` exists.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path does not exist.
    pub fn assert_exists(&self, rel: &str) {
        let full_path = self.path(rel);
        assert!(
            full_path.exists(),
            "Expected path to exist: {}",
            full_path.display()
        );
    }

    /// Assert that `rel` does **not** exist.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path exists.
    pub fn assert_not_exists(&self, rel: &str) {
        let full_path = self.path(rel);
        assert!(
            !full_path.exists(),
            "Expected path NOT to exist: {}",
            full_path.display()
        );
    }

    /// Assert that this tree has the same paths and file contents as `other`.
    ///
    /// # Panics
    /// Panics on the first difference.
    pub fn assert_mirrors(&self, other: &TestTree) {
        let ours = self.paths();
        let theirs = other.paths();
        assert_eq!(ours, theirs, "Trees differ in structure");
        for rel in &ours {
            let path = self.path(rel);
            if path.is_file() {
                assert_eq!(
                    fs::read(&path).unwrap(),
                    fs::read(other.path(rel)).unwrap(),
                    "Content differs at {rel}"
                );
            }
        }
    }
}

fn collect(dir: &Path, prefix: &str, out: &mut BTreeSet<String>) {
    let entries = fs::read_dir(dir)
        .unwrap_or_else(|e| panic!("TestTree::paths: failed to read {}: {e}", dir.display()));
    for entry in entries {
        let entry = entry.unwrap();
        let name = entry.file_name().to_string_lossy().into_owned();
        let rel = if prefix.is_empty() {
            name
        } else {
            format!("{prefix}/{name}")
        };
        if entry.file_type().unwrap().is_dir() {
            collect(&entry.path(), &rel, out);
        }
        out.insert(rel);
    }
}
