//! Drift detection: fails closed. Every condition below sets
//! `required = true`; absence of all of them is the only way to get
//! `required = false`.

use std::path::{Path, PathBuf};

use librarian_core::{is_self_referential, paths, VersionFingerprint};
use librarian_store::Store;

use crate::vcs::VersionControlProbe;

#[derive(Debug, Clone)]
pub struct DriftReport {
    pub required: bool,
    pub reason: String,
    pub is_self_referential: bool,
}

/// `spot_check` is a small sample of workspace-relative paths whose
/// on-disk checksum is recomputed and compared against the stored one —
/// checking every file on every query would defeat the point of caching.
pub fn check(
    workspace: &Path,
    expected: &VersionFingerprint,
    probe: &dyn VersionControlProbe,
    spot_check: &[PathBuf],
    source_files_exist: bool,
) -> anyhow::Result<DriftReport> {
    let self_referential = is_self_referential(workspace);

    if !paths::db_path(workspace).is_file() {
        return Ok(DriftReport {
            required: true,
            reason: "no knowledge store found for this workspace; run `librarian bootstrap` to build one"
                .to_string(),
            is_self_referential: self_referential,
        });
    }

    let store = match Store::open(workspace, expected) {
        Ok(s) => s,
        Err(_) => {
            return Ok(DriftReport {
                required: true,
                reason: force_reason("stored schema fingerprint is incompatible with this build"),
                is_self_referential: self_referential,
            });
        }
    };

    let Some(recorded) = store.read_fingerprint()? else {
        return Ok(DriftReport {
            required: true,
            reason: force_reason("store has no recorded version fingerprint"),
            is_self_referential: self_referential,
        });
    };

    let current_head = probe.current_head(workspace);
    if recorded.head_commit != current_head {
        return Ok(DriftReport {
            required: true,
            reason: force_reason(&format!(
                "recorded git HEAD {:?} differs from current git HEAD {:?}",
                recorded.head_commit, current_head
            )),
            is_self_referential: self_referential,
        });
    }

    for rel in spot_check {
        let abs = workspace.join(rel);
        let Ok(bytes) = std::fs::read(&abs) else { continue };
        let on_disk = librarian_core::checksum_bytes(&bytes);
        if let Some(file) = store.get_file(rel)? {
            if file.checksum != on_disk {
                return Ok(DriftReport {
                    required: true,
                    reason: force_reason(&format!("{} has changed on disk since the last bootstrap", rel.display())),
                    is_self_referential: self_referential,
                });
            }
        }
    }

    let stats = store.get_stats()?;
    if stats.total_functions == 0 && source_files_exist {
        return Ok(DriftReport {
            required: true,
            reason: force_reason("no functions are recorded despite source files being present"),
            is_self_referential: self_referential,
        });
    }

    Ok(DriftReport { required: false, reason: String::new(), is_self_referential: self_referential })
}

fn force_reason(detail: &str) -> String {
    format!("{detail}. Run `librarian bootstrap` with `--force` to re-index.")
}
