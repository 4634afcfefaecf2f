//! Recursive tree enumeration

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use serde::Serialize;
use walkdir::WalkDir;

use crate::{Error, Result, TreePath};

/// Kind of a filesystem entry. Symlinks are reported, never followed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Directory,
    Symlink,
}

impl EntryKind {
    fn from_file_type(file_type: fs::FileType) -> Self {
        if file_type.is_symlink() {
            Self::Symlink
        } else if file_type.is_dir() {
            Self::Directory
        } else {
            Self::File
        }
    }
}

/// One entry found below a tree root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEntry {
    pub path: TreePath,
    pub kind: EntryKind,
}

/// Enumerate every entry below `root`, excluding `root` itself.
///
/// Entries come back in pre-order: a directory always precedes its
/// children, and siblings are sorted by file name so that the order is
/// stable across runs.
///
/// # Errors
///
/// Fails on the first entry that cannot be read, including a missing root.
pub fn walk_tree(root: &Path) -> Result<Vec<TreeEntry>> {
    let mut entries = Vec::new();

    for entry in WalkDir::new(root)
        .min_depth(1)
        .follow_links(false)
        .sort_by_file_name()
    {
        let entry = entry?;
        let Some(path) = TreePath::relative_to(root, entry.path()) else {
            return Err(Error::Walk {
                path: entry.path().to_path_buf(),
                message: format!("entry escapes root {}", root.display()),
            });
        };
        entries.push(TreeEntry {
            path,
            kind: EntryKind::from_file_type(entry.file_type()),
        });
    }

    tracing::debug!(root = %root.display(), count = entries.len(), "Walked tree");
    Ok(entries)
}

/// Kind of whatever exists at `path`, or `None` if nothing does.
///
/// A path whose parent is a file does not exist either.
pub fn entry_kind(path: &Path) -> Result<Option<EntryKind>> {
    match fs::symlink_metadata(path) {
        Ok(meta) => Ok(Some(EntryKind::from_file_type(meta.file_type()))),
        Err(e) if matches!(e.kind(), ErrorKind::NotFound | ErrorKind::NotADirectory) => Ok(None),
        Err(e) => Err(Error::io(path, e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn walk_lists_parents_before_children() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("b/inner")).unwrap();
        fs::write(dir.path().join("b/inner/f.txt"), "x").unwrap();
        fs::write(dir.path().join("a.txt"), "y").unwrap();

        let entries = walk_tree(dir.path()).unwrap();
        let paths: Vec<&str> = entries.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(paths, vec!["a.txt", "b", "b/inner", "b/inner/f.txt"]);
        assert_eq!(entries[1].kind, EntryKind::Directory);
        assert_eq!(entries[3].kind, EntryKind::File);
    }

    #[test]
    fn walk_missing_root_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = walk_tree(&dir.path().join("absent")).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn entry_kind_reports_absence() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("file"), "x").unwrap();
        assert_eq!(entry_kind(&dir.path().join("nope")).unwrap(), None);
        assert_eq!(entry_kind(&dir.path().join("file/below")).unwrap(), None);
        assert_eq!(
            entry_kind(dir.path()).unwrap(),
            Some(EntryKind::Directory)
        );
    }
}
