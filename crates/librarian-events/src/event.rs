//! Typed lifecycle events published on the [`crate::bus::EventBus`].

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    TaskReceived { task_id: String, intent: String },
    TaskCompleted { task_id: String, success: bool },
    TaskFailed { task_id: String, reason: String },
    FileModified { path: PathBuf },
    BootstrapStarted { workspace: PathBuf },
    BootstrapCompleted { workspace: PathBuf, files_indexed: u64, duration_ms: u64 },
}

impl Event {
    /// One-line description used for the `tracing` sink every event is
    /// also emitted through, matching the teacher's
    /// `tracing::info!`-everywhere convention.
    pub fn log(&self) {
        match self {
            Event::TaskReceived { task_id, intent } => {
                tracing::info!(task_id, intent, "task received");
            }
            Event::TaskCompleted { task_id, success } => {
                tracing::info!(task_id, success, "task completed");
            }
            Event::TaskFailed { task_id, reason } => {
                tracing::warn!(task_id, reason, "task failed");
            }
            Event::FileModified { path } => {
                tracing::debug!(path = %path.display(), "file modified");
            }
            Event::BootstrapStarted { workspace } => {
                tracing::info!(workspace = %workspace.display(), "bootstrap started");
            }
            Event::BootstrapCompleted { workspace, files_indexed, duration_ms } => {
                tracing::info!(
                    workspace = %workspace.display(),
                    files_indexed,
                    duration_ms,
                    "bootstrap completed"
                );
            }
        }
    }
}
