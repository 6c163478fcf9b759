//! `getTaskContext`: the primary entry point external agent processes
//! call before starting work on a task.

use std::path::{Path, PathBuf};

use librarian_core::{ContextPack, VersionFingerprint};
use librarian_query::{run_query, Depth, QueryRequest, Requirement, SelectionSource};
use librarian_store::Store;
use serde::{Deserialize, Serialize};

use crate::cache::{CacheKey, TaskContextCache};
use crate::phase::{detect_phase, Phase};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityNorms {
    pub require_tests: bool,
    pub require_doc_comments: bool,
    pub notes: Vec<String>,
}

fn quality_norms_for(affected_files: &[PathBuf]) -> QualityNorms {
    let touches_public_api = affected_files.iter().any(|f| {
        let s = f.to_string_lossy();
        s.contains("lib.rs") || s.contains("/api/") || s.ends_with(".proto")
    });
    let touches_tests = affected_files.iter().any(|f| f.to_string_lossy().contains("test"));

    let mut notes = Vec::new();
    if touches_public_api {
        notes.push("public API surface touched: keep doc comments current".to_string());
    }
    if touches_tests {
        notes.push("test files touched: prefer adapting existing fixtures over duplicating them".to_string());
    }

    QualityNorms { require_tests: !touches_tests, require_doc_comments: touches_public_api, notes }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskContext {
    pub prompt_injection: String,
    pub packs: Vec<ContextPack>,
    pub phase: Phase,
    pub quality_norms: QualityNorms,
    pub cache_hit: bool,
}

fn format_prompt_injection(intent: &str, phase: Phase, packs: &[ContextPack]) -> String {
    let mut out = format!("# Task context for: {intent}\nPhase: {phase:?}\n\n");
    for pack in packs {
        out.push_str(&format!("## {} ({})\n{}\n", pack.pack_id, pack.pack_type, pack.summary));
        for fact in &pack.key_facts {
            out.push_str(&format!("- {fact}\n"));
        }
        out.push('\n');
    }
    out
}

#[allow(clippy::too_many_arguments)]
pub async fn get_task_context(
    cache: &TaskContextCache,
    workspace: &Path,
    store: &Store,
    fingerprint: &VersionFingerprint,
    intent: &str,
    affected_files: &[PathBuf],
    task_type: &str,
    previous_phase: Option<Phase>,
    recent_tool_calls: &[String],
) -> anyhow::Result<TaskContext> {
    let key = CacheKey::new(workspace, intent, affected_files, task_type, previous_phase, recent_tool_calls);
    if let Some(mut cached) = cache.get(&key) {
        cached.cache_hit = true;
        return Ok(cached);
    }

    let phase = detect_phase(intent, recent_tool_calls);
    let request = QueryRequest {
        intent: intent.to_string(),
        depth: Depth::L1,
        affected_files: affected_files.to_vec(),
        llm_requirement: Requirement::Optional,
        embedding_requirement: Requirement::Optional,
        ..QueryRequest::default()
    };
    let response = run_query(&request, store, fingerprint, false, true, None, None, None, SelectionSource::Default).await?;

    let context = TaskContext {
        prompt_injection: format_prompt_injection(intent, phase, &response.packs),
        packs: response.packs,
        phase,
        quality_norms: quality_norms_for(affected_files),
        cache_hit: false,
    };

    cache.insert(key, context.clone());
    Ok(context)
}
