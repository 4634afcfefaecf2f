//! Atomic copy and removal primitives for replica trees

use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use filetime::FileTime;
use fs2::FileExt;

use crate::walk::EntryKind;
use crate::{Error, Result};

/// Copy `source` over `target` so that `target` is never observed
/// half-written.
///
/// Streams into a hidden temp file next to `target` (same filesystem),
/// holding an exclusive advisory lock, flushes it to disk and renames it
/// into place. Missing parent directories are created. On failure the
/// temp file is removed and `target` is left as it was.
///
/// Returns the number of bytes copied.
pub fn copy_atomic(source: &Path, target: &Path) -> Result<u64> {
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }

    let temp_path = temp_sibling(target);
    let bytes = match write_temp(source, &temp_path, target) {
        Ok(bytes) => bytes,
        Err(e) => {
            let _ = fs::remove_file(&temp_path);
            return Err(e);
        }
    };

    #[cfg(windows)]
    clear_readonly(target);

    if let Err(e) = fs::rename(&temp_path, target) {
        let _ = fs::remove_file(&temp_path);
        return Err(Error::io(target, e));
    }

    Ok(bytes)
}

fn temp_sibling(target: &Path) -> PathBuf {
    let temp_name = format!(
        ".{}.{}.tmp",
        target
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default(),
        std::process::id()
    );
    target.with_file_name(temp_name)
}

fn write_temp(source: &Path, temp_path: &Path, target: &Path) -> Result<u64> {
    let input = File::open(source).map_err(|e| Error::io(source, e))?;

    let temp_file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(temp_path)
        .map_err(|e| Error::io(temp_path, e))?;

    temp_file
        .lock_exclusive()
        .map_err(|_| Error::LockFailed {
            path: target.to_path_buf(),
        })?;

    let mut reader = BufReader::new(input);
    let mut writer = BufWriter::new(&temp_file);
    let bytes = std::io::copy(&mut reader, &mut writer).map_err(|e| Error::io(source, e))?;
    writer.flush().map_err(|e| Error::io(temp_path, e))?;
    drop(writer);

    temp_file.sync_all().map_err(|e| Error::io(temp_path, e))?;

    temp_file.unlock().map_err(|_| Error::LockFailed {
        path: target.to_path_buf(),
    })?;

    Ok(bytes)
}

#[cfg(windows)]
fn clear_readonly(target: &Path) {
    if let Ok(meta) = fs::metadata(target) {
        let mut permissions = meta.permissions();
        if permissions.readonly() {
            permissions.set_readonly(false);
            let _ = fs::set_permissions(target, permissions);
        }
    }
}

/// Propagate permission bits and the last-modified time from `source`
/// to `target`.
///
/// The timestamp is written first: once the permissions are copied the
/// target may be read-only.
pub fn copy_attributes(source: &Path, target: &Path) -> Result<()> {
    let meta = fs::metadata(source).map_err(|e| Error::io(source, e))?;

    let mtime = FileTime::from_last_modification_time(&meta);
    filetime::set_file_mtime(target, mtime).map_err(|e| Error::io(target, e))?;

    fs::set_permissions(target, meta.permissions()).map_err(|e| Error::io(target, e))?;
    Ok(())
}

/// Remove a single entry. Directories must already be empty.
pub fn remove_entry(path: &Path, kind: EntryKind) -> Result<()> {
    let result = match kind {
        EntryKind::Directory => fs::remove_dir(path),
        EntryKind::File | EntryKind::Symlink => fs::remove_file(path),
    };
    result.map_err(|e| Error::io(path, e))
}

/// Create `path` and any missing parents.
///
/// Returns `true` if the directory did not exist before.
pub fn ensure_dir(path: &Path) -> Result<bool> {
    if path.is_dir() {
        return Ok(false);
    }
    fs::create_dir_all(path).map_err(|e| Error::io(path, e))?;
    Ok(true)
}
