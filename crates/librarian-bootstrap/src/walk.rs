//! Gitignore-aware workspace traversal, generalizing the teacher's
//! `commands.rs::walk_filesystem` BFS (which used raw `std::fs::read_dir`)
//! onto the `ignore` crate so vendor trees are skipped the same way `git`
//! itself would skip them.

use std::path::{Path, PathBuf};

use ignore::WalkBuilder;

/// Directory names excluded on top of whatever `.gitignore` already
/// covers. Configurable per the spec's Open Question — callers can pass
/// additions via [`discover_files`]'s `extra_excludes`.
pub const DEFAULT_EXCLUDES: &[&str] = &[
    ".git",
    "node_modules",
    "vendor",
    "dist",
    "build",
    "coverage",
    "target",
    ".librarian",
];

pub fn discover_files(workspace: &Path, extra_excludes: &[String]) -> anyhow::Result<Vec<PathBuf>> {
    let mut excludes: Vec<String> = DEFAULT_EXCLUDES.iter().map(|s| s.to_string()).collect();
    excludes.extend(extra_excludes.iter().cloned());

    let mut builder = WalkBuilder::new(workspace);
    builder.hidden(false).git_ignore(true).git_exclude(true);

    let mut files = Vec::new();
    for entry in builder.build() {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                tracing::warn!("walk error: {e}");
                continue;
            }
        };
        let path = entry.path();
        if excludes.iter().any(|ex| path.components().any(|c| c.as_os_str() == ex.as_str())) {
            continue;
        }
        if entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
            files.push(path.to_path_buf());
        }
    }
    files.sort();
    Ok(files)
}
