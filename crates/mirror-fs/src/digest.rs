//! Content digests used as an equality oracle
//!
//! Change detection compares a 128-bit MD5 digest of each file's full
//! content. Digests are never persisted; they are recomputed on every
//! comparison, so the cost is proportional to file size.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use md5::{Digest, Md5};

use crate::{Error, Result};

const BUFFER_SIZE: usize = 64 * 1024;

/// A 128-bit content fingerprint. Equality is byte-for-byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentDigest([u8; 16]);

impl ContentDigest {
    /// Lowercase hex rendering.
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{:02x}", b)).collect()
    }
}

impl std::fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

fn finish(hasher: Md5) -> ContentDigest {
    let mut bytes = [0u8; 16];
    bytes.copy_from_slice(&hasher.finalize());
    ContentDigest(bytes)
}

/// Compute the digest of an in-memory buffer.
pub fn digest_bytes(content: &[u8]) -> ContentDigest {
    let mut hasher = Md5::new();
    hasher.update(content);
    finish(hasher)
}

/// Compute the digest of a file by streaming its content.
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be opened or stops being
/// readable part way through.
pub fn digest_file(path: &Path) -> Result<ContentDigest> {
    let mut file = File::open(path).map_err(|e| Error::io(path, e))?;
    let mut hasher = Md5::new();
    let mut buffer = vec![0u8; BUFFER_SIZE];

    loop {
        let read = file.read(&mut buffer).map_err(|e| Error::io(path, e))?;
        if read == 0 {
            break;
        }
        hasher.update(&buffer[..read]);
    }

    Ok(finish(hasher))
}

/// Decides whether a replica file already matches its source file.
pub trait ContentComparator: Send + Sync {
    /// Returns `true` when `replica` needs no update from `source`.
    fn content_equals(&self, source: &Path, replica: &Path) -> Result<bool>;

    /// Short name used in log output.
    fn name(&self) -> &'static str;
}

/// Compares files by content digest. Metadata is ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct DigestComparator;

impl ContentComparator for DigestComparator {
    fn content_equals(&self, source: &Path, replica: &Path) -> Result<bool> {
        let a = digest_file(source)?;
        let b = digest_file(replica)?;
        tracing::trace!(source = %a, replica = %b, path = %replica.display(), "Compared digests");
        Ok(a == b)
    }

    fn name(&self) -> &'static str {
        "digest"
    }
}

/// Compares files by last-modified timestamp only.
///
/// Cheap, but sensitive to clock skew and to copies that do not carry the
/// timestamp across.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimestampComparator;

impl ContentComparator for TimestampComparator {
    fn content_equals(&self, source: &Path, replica: &Path) -> Result<bool> {
        let modified = |path: &Path| {
            std::fs::metadata(path)
                .and_then(|m| m.modified())
                .map_err(|e| Error::io(path, e))
        };
        Ok(modified(source)? == modified(replica)?)
    }

    fn name(&self) -> &'static str {
        "mtime"
    }
}
