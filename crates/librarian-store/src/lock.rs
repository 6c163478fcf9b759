//! Single-writer advisory lock over the store's directory.
//!
//! Readers never take this lock — SQLite's own WAL-mode readers don't
//! need it — but every writer (bootstrap, incremental update, vacuum)
//! must hold it for the duration of its transaction so two `librarian`
//! processes never interleave writes to the same workspace.

use std::fs::{File, OpenOptions};
use std::path::Path;

use fs2::FileExt;
use librarian_core::LibrarianError;

pub struct WriteLock {
    file: File,
}

impl WriteLock {
    /// Acquire the lock, blocking until it's free. Used by commands that
    /// are fine waiting out a concurrent writer (e.g. `bootstrap`).
    pub fn acquire_blocking(workspace: &Path) -> anyhow::Result<Self> {
        let path = librarian_core::paths::tmp_dir(workspace).join("write.lock");
        let file = OpenOptions::new().create(true).write(true).open(&path)?;
        file.lock_exclusive()?;
        Ok(Self { file })
    }

    /// Try to acquire the lock without blocking. Used by query, which
    /// would rather report [`LibrarianError::StorageLocked`] than stall
    /// an interactive agent waiting on a background bootstrap.
    pub fn try_acquire(workspace: &Path) -> Result<Self, LibrarianError> {
        let path = librarian_core::paths::tmp_dir(workspace).join("write.lock");
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .open(&path)
            .map_err(|e| LibrarianError::StorageLocked(e.to_string()))?;
        file.try_lock_exclusive()
            .map_err(|_| LibrarianError::StorageLocked(format!("{} is held by another process", path.display())))?;
        Ok(Self { file })
    }
}

impl Drop for WriteLock {
    fn drop(&mut self) {
        let _ = fs2::FileExt::unlock(&self.file);
    }
}
