//! Per-intent TTL cache for task contexts. Entries are replaced wholesale
//! on expiry rather than refreshed in place — a 30s-stale answer is
//! acceptable, a partially-stale one isn't.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use dashmap::DashMap;

use crate::context::TaskContext;
use crate::phase::Phase;

pub const TTL: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    workspace: PathBuf,
    intent: String,
    affected_files: Vec<PathBuf>,
    task_type: String,
    previous_phase: Option<Phase>,
    recent_tool_calls: Vec<String>,
}

impl CacheKey {
    pub fn new(
        workspace: &Path,
        intent: &str,
        affected_files: &[PathBuf],
        task_type: &str,
        previous_phase: Option<Phase>,
        recent_tool_calls: &[String],
    ) -> Self {
        let mut affected_files = affected_files.to_vec();
        affected_files.sort();
        let mut recent_tool_calls = recent_tool_calls.to_vec();
        recent_tool_calls.sort();
        Self {
            workspace: workspace.to_path_buf(),
            intent: intent.to_string(),
            affected_files,
            task_type: task_type.to_string(),
            previous_phase,
            recent_tool_calls,
        }
    }
}

pub struct TaskContextCache {
    entries: DashMap<CacheKey, (Instant, TaskContext)>,
}

impl TaskContextCache {
    pub fn new() -> Self {
        Self { entries: DashMap::new() }
    }

    pub fn get(&self, key: &CacheKey) -> Option<TaskContext> {
        let entry = self.entries.get(key)?;
        let (inserted_at, context) = entry.value();
        if inserted_at.elapsed() < TTL {
            Some(context.clone())
        } else {
            drop(entry);
            self.entries.remove(key);
            None
        }
    }

    pub fn insert(&self, key: CacheKey, context: TaskContext) {
        self.entries.insert(key, (Instant::now(), context));
    }
}

impl Default for TaskContextCache {
    fn default() -> Self {
        Self::new()
    }
}
