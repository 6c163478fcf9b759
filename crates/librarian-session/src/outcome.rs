//! `reportTaskOutcome`: records what actually happened after a task ran,
//! appended to a per-workspace log rather than overwriting — the log is
//! the raw material future quality-norm tuning reads from.

use std::path::Path;

use librarian_core::paths;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskOutcome {
    pub task_id: String,
    pub success: bool,
    pub modified_files: Vec<String>,
    pub failure_reason: Option<String>,
    pub usefulness: Option<f32>,
    pub missing_context: Option<String>,
    pub reported_at: chrono::DateTime<chrono::Utc>,
}

pub fn report_task_outcome(workspace: &Path, outcome: &TaskOutcome) -> anyhow::Result<()> {
    paths::ensure_state_dirs(workspace)?;
    let log_path = paths::state_dir(workspace).join("task_outcomes.jsonl");
    let line = serde_json::to_string(outcome)?;
    use std::io::Write;
    let mut file = std::fs::OpenOptions::new().create(true).append(true).open(log_path)?;
    writeln!(file, "{line}")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appends_one_line_per_outcome() {
        let dir = tempfile::tempdir().unwrap();
        let outcome = TaskOutcome {
            task_id: "t1".to_string(),
            success: true,
            modified_files: vec!["src/lib.rs".to_string()],
            failure_reason: None,
            usefulness: Some(0.8),
            missing_context: None,
            reported_at: chrono::Utc::now(),
        };
        report_task_outcome(dir.path(), &outcome).unwrap();
        report_task_outcome(dir.path(), &outcome).unwrap();

        let log = std::fs::read_to_string(dir.path().join(".librarian/task_outcomes.jsonl")).unwrap();
        assert_eq!(log.lines().count(), 2);
    }
}
