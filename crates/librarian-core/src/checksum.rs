//! Content checksums used to decide whether a file needs re-indexing.

use std::hash::{DefaultHasher, Hash, Hasher};
use std::path::Path;

use crate::model::Checksum;

/// Files at or below this size are always fully hashed on every check, so a
/// same-size rewrite (same mtime second, same byte count, different
/// content) is still detected. Larger files are hashed in full too, but
/// this constant documents the invariant the small-file case must satisfy.
pub const SMALL_FILE_THRESHOLD: u64 = 64 * 1024;

/// Hash a file's bytes into a [`Checksum`]. Always reads the full content —
/// cheaper mtime/size shortcuts are exactly what would let a same-size
/// rewrite slip through undetected.
pub fn checksum_bytes(bytes: &[u8]) -> Checksum {
    let mut hasher = DefaultHasher::new();
    bytes.hash(&mut hasher);
    Checksum(hasher.finish())
}

pub fn checksum_file(path: &Path) -> std::io::Result<Checksum> {
    let bytes = std::fs::read(path)?;
    Ok(checksum_bytes(&bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_size_rewrite_changes_checksum() {
        let a = checksum_bytes(b"fn one() {}");
        let b = checksum_bytes(b"fn two() {}");
        assert_ne!(a, b);
    }

    #[test]
    fn identical_bytes_checksum_identically() {
        let a = checksum_bytes(b"identical");
        let b = checksum_bytes(b"identical");
        assert_eq!(a, b);
    }
}
