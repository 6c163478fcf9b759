//! File monitoring: snapshot affected files at task start, report which
//! ones changed at task stop. Small files get a content hash so a
//! same-size rewrite inside one mtime second is still caught.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use dashmap::DashMap;
use librarian_core::{checksum_bytes, Checksum, SMALL_FILE_THRESHOLD};

#[derive(Debug, Clone, PartialEq)]
struct FileSnapshot {
    exists: bool,
    mtime_secs: i64,
    ctime_secs: i64,
    size: u64,
    content_hash: Option<Checksum>,
}

fn snapshot(path: &Path) -> FileSnapshot {
    let Ok(meta) = std::fs::metadata(path) else {
        return FileSnapshot { exists: false, mtime_secs: 0, ctime_secs: 0, size: 0, content_hash: None };
    };

    let mtime_secs = meta.modified().ok().and_then(|t| t.duration_since(UNIX_EPOCH).ok()).map(|d| d.as_secs() as i64).unwrap_or(0);
    #[cfg(unix)]
    let ctime_secs = {
        use std::os::unix::fs::MetadataExt;
        meta.ctime()
    };
    #[cfg(not(unix))]
    let ctime_secs = mtime_secs;

    let size = meta.len();
    let content_hash =
        if size <= SMALL_FILE_THRESHOLD { std::fs::read(path).ok().map(|b| checksum_bytes(&b)) } else { None };

    FileSnapshot { exists: true, mtime_secs, ctime_secs, size, content_hash }
}

pub struct FileMonitor {
    baselines: DashMap<String, HashMap<PathBuf, FileSnapshot>>,
}

impl FileMonitor {
    pub fn new() -> Self {
        Self { baselines: DashMap::new() }
    }

    pub fn start(&self, task_id: &str, files: &[PathBuf]) {
        let snapshots = files.iter().map(|f| (f.clone(), snapshot(f))).collect();
        self.baselines.insert(task_id.to_string(), snapshots);
    }

    /// Returns the subset of monitored files whose snapshot changed since
    /// `start`. Removes the baseline regardless of task-id presence.
    pub fn stop(&self, task_id: &str) -> Vec<PathBuf> {
        let Some((_, baseline)) = self.baselines.remove(task_id) else {
            return Vec::new();
        };
        baseline
            .into_iter()
            .filter_map(|(path, before)| {
                let after = snapshot(&path);
                if after != before {
                    Some(path)
                } else {
                    None
                }
            })
            .collect()
    }

    /// Runs `body`, guaranteeing `stop` is called on every exit path
    /// (success, early return, or panic unwind) and returning `(result,
    /// changed_files)`. `stop` is idempotent (a missing baseline just
    /// yields no changes), so the panic path and the normal path calling
    /// it a second time is harmless.
    pub fn with_monitoring<T>(&self, task_id: &str, files: &[PathBuf], body: impl FnOnce() -> T) -> (T, Vec<PathBuf>) {
        self.start(task_id, files);

        struct StopGuard<'a> {
            monitor: &'a FileMonitor,
            task_id: &'a str,
        }
        impl Drop for StopGuard<'_> {
            fn drop(&mut self) {
                self.monitor.stop(self.task_id);
            }
        }
        let _guard = StopGuard { monitor: self, task_id };

        let result = body();
        let changed = self.stop(task_id);
        (result, changed)
    }
}

impl Default for FileMonitor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_content_change_within_the_same_size_and_second() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.txt");
        std::fs::write(&path, "aaaa").unwrap();

        let monitor = FileMonitor::new();
        monitor.start("t1", &[path.clone()]);
        std::fs::write(&path, "bbbb").unwrap();
        let changed = monitor.stop("t1");
        assert_eq!(changed, vec![path]);
    }

    #[test]
    fn reports_no_changes_when_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.txt");
        std::fs::write(&path, "aaaa").unwrap();

        let monitor = FileMonitor::new();
        monitor.start("t1", &[path]);
        let changed = monitor.stop("t1");
        assert!(changed.is_empty());
    }
}
