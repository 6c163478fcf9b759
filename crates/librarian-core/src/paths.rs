//! Conventions for the `.librarian/` state directory.

use std::path::{Path, PathBuf};

pub const STATE_DIR: &str = ".librarian";
pub const DB_FILE: &str = "librarian.sqlite";
pub const SESSIONS_DIR: &str = "query_sessions";
pub const TMP_DIR: &str = "tmp";

pub fn state_dir(workspace: &Path) -> PathBuf {
    workspace.join(STATE_DIR)
}

pub fn db_path(workspace: &Path) -> PathBuf {
    state_dir(workspace).join(DB_FILE)
}

pub fn sessions_dir(workspace: &Path) -> PathBuf {
    state_dir(workspace).join(SESSIONS_DIR)
}

pub fn session_file(workspace: &Path, session_id: &str) -> PathBuf {
    sessions_dir(workspace).join(format!("{session_id}.json"))
}

pub fn tmp_dir(workspace: &Path) -> PathBuf {
    state_dir(workspace).join(TMP_DIR)
}

pub fn ensure_state_dirs(workspace: &Path) -> std::io::Result<()> {
    std::fs::create_dir_all(state_dir(workspace))?;
    std::fs::create_dir_all(sessions_dir(workspace))?;
    std::fs::create_dir_all(tmp_dir(workspace))?;
    Ok(())
}
