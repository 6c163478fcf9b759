//! The 8-stage Query Pipeline (C4): Gate, Classify, Retrieve, Rank,
//! Assemble, Synthesize, Sanitize, Surface warnings.

use std::path::PathBuf;
use std::time::Instant;

use librarian_core::{ContextPack, EntityId, LibrarianError, StoreStats, VersionFingerprint};
use librarian_providers::{LlmProvider, Readiness, SynthesisRequest};
use librarian_store::Store;
use serde::{Deserialize, Serialize};

use crate::classify::{classify, IntentMode};
use crate::rank::{rank, RankWeights};
use crate::retrieve::{candidates_from_store, enumerate_files, structural_callers};
use crate::sanitize::{sanitize_id, sanitize_prose};
use crate::warnings::{low_confidence_warning, order_warnings, Warning};

const MIN_EMBEDDING_COVERAGE: f32 = 0.25;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Requirement {
    Required,
    Optional,
    Disabled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Depth {
    L0,
    L1,
    L2,
}

#[derive(Debug, Clone)]
pub struct QueryRequest {
    pub intent: String,
    pub depth: Depth,
    pub affected_files: Vec<PathBuf>,
    pub llm_requirement: Requirement,
    pub embedding_requirement: Requirement,
    pub timeout_ms: u64,
    pub deterministic: bool,
    pub limit: usize,
}

impl Default for QueryRequest {
    fn default() -> Self {
        Self {
            intent: String::new(),
            depth: Depth::L0,
            affected_files: Vec::new(),
            llm_requirement: Requirement::Optional,
            embedding_requirement: Requirement::Optional,
            timeout_ms: 10_000,
            deterministic: true,
            limit: 10,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SynthesisMode {
    Llm,
    Heuristic,
}

/// Where the synthesis provider came from, per §4.4's session contract:
/// a prior session's preference, a fresh readiness probe, or no provider
/// at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionSource {
    Session,
    Probe,
    Default,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResponse {
    pub packs: Vec<ContextPack>,
    pub total_confidence: f32,
    pub cache_hit: bool,
    pub latency_ms: u64,
    pub version: VersionFingerprint,
    pub disclosures: Vec<String>,
    pub drill_down_hints: Vec<String>,
    pub method_hints: Vec<String>,
    pub coverage_gaps: Vec<String>,
    pub synthesis_mode: SynthesisMode,
    pub synthesis: Option<String>,
    pub llm_error: Option<String>,
    #[serde(rename = "selectedProvider")]
    pub selected_provider: Option<String>,
    #[serde(rename = "selectionSource")]
    pub selection_source: SelectionSource,
}

/// Runs the full pipeline. `drift_required` is the gate's input from C3;
/// `auto_bootstrap` lets a caller mark a session as allowed to proceed
/// anyway (stage 1). `llm` is `None` when `llmRequirement=disabled` or no
/// provider is configured. `selected_provider`/`selection_source` describe
/// where that provider (if any) came from and are echoed back on the
/// response; the caller is responsible for scoping the provider's
/// environment exposure around this call.
#[allow(clippy::too_many_arguments)]
pub async fn run_query(
    request: &QueryRequest,
    store: &Store,
    fingerprint: &VersionFingerprint,
    drift_required: bool,
    auto_bootstrap: bool,
    readiness: Option<&Readiness>,
    llm: Option<&dyn LlmProvider>,
    selected_provider: Option<String>,
    selection_source: SelectionSource,
) -> anyhow::Result<QueryResponse> {
    let started = Instant::now();

    // Stage 1: Gate.
    if drift_required && !auto_bootstrap {
        return Err(LibrarianError::NotBootstrapped(
            "knowledge store is stale; run `librarian bootstrap`".to_string(),
        )
        .into());
    }

    // Stage 2: Classify.
    let mode = classify(&request.intent);

    let mut warnings: Vec<Warning> = Vec::new();
    let mut coverage_gaps = Vec::new();

    // Stage 3 + 4: Retrieve + Rank. Enumeration/structural modes bypass
    // semantic scoring and return sorted deterministic results.
    let mut packs = Vec::new();
    match mode {
        IntentMode::Enumeration => {
            for path in enumerate_files(store)? {
                packs.push(build_pack(
                    format!("file:{}", path.display()),
                    "enumeration",
                    path.clone(),
                    format!("{}", path.display()),
                    vec![path],
                    1.0,
                    fingerprint,
                ));
            }
        }
        IntentMode::Structural => {
            let target = request.intent.split_whitespace().last().unwrap_or("").to_string();
            for path in structural_callers(store, &target)? {
                packs.push(build_pack(
                    format!("caller:{}", path.display()),
                    "structural",
                    path.clone(),
                    format!("{} calls {}", path.display(), target),
                    vec![path],
                    0.9,
                    fingerprint,
                ));
            }
        }
        IntentMode::General => {
            let embedding_coverage = store.embedding_coverage()?;
            if request.embedding_requirement == Requirement::Required
                && embedding_coverage < MIN_EMBEDDING_COVERAGE
            {
                return Err(LibrarianError::InsufficientEmbeddingCoverage(format!(
                    "embedding coverage {embedding_coverage:.2} is below the required {MIN_EMBEDDING_COVERAGE:.2}"
                ))
                .into());
            }
            if embedding_coverage < MIN_EMBEDDING_COVERAGE {
                coverage_gaps.push("semantic coverage is partial; ranking falls back to lexical+proximity only".to_string());
            }

            let candidates = candidates_from_store(store)?;
            let ranked = rank(&request.intent, candidates, &request.affected_files, &RankWeights::default());
            for (i, r) in ranked.into_iter().take(request.limit).enumerate() {
                let confidence = r.score.clamp(0.0, 1.0);
                if let Some(w) = low_confidence_warning(confidence) {
                    warnings.push(w);
                }
                packs.push(build_pack(
                    r.candidate.pack_id.clone(),
                    "general",
                    r.candidate.path.clone(),
                    format!("{} ({})", r.candidate.name, i),
                    vec![r.candidate.path],
                    confidence,
                    fingerprint,
                ));
            }
        }
    }

    // Stage 6: Synthesize (optional).
    let (synthesis_mode, synthesis, llm_error) = if request.llm_requirement == Requirement::Disabled {
        (SynthesisMode::Heuristic, None, None)
    } else {
        match (readiness, llm) {
            (Some(r), Some(provider)) if r.ready => {
                let synth_request = SynthesisRequest {
                    intent: request.intent.clone(),
                    key_facts: packs.iter().map(|p| p.summary.clone()).collect(),
                    related_files: packs.iter().flat_map(|p| p.related_files.iter().map(|f| f.display().to_string())).collect(),
                };
                match provider.synthesize(&synth_request).await {
                    Ok(result) => (SynthesisMode::Llm, Some(result.summary), None),
                    Err(e) => {
                        warnings.push(Warning::critical(format!("synthesis failed: {e}")));
                        (SynthesisMode::Heuristic, None, Some(e.to_string()))
                    }
                }
            }
            _ if request.llm_requirement == Requirement::Required => {
                return Err(LibrarianError::ProviderNotReady(
                    readiness.map(|r| r.reason.clone()).unwrap_or_else(|| "no provider configured".to_string()),
                )
                .into());
            }
            _ => {
                coverage_gaps.push("no LLM provider ready; returning structural-only answer".to_string());
                (SynthesisMode::Heuristic, None, None)
            }
        }
    };

    // Stage 7: Sanitize.
    for pack in &mut packs {
        pack.summary = sanitize_prose(&pack.summary);
        pack.pack_id = sanitize_id(&pack.pack_id);
        pack.key_facts = pack.key_facts.iter().map(|f| sanitize_prose(f)).collect();
    }
    let synthesis = synthesis.map(|s| sanitize_prose(&s));

    // Stage 8: Surface warnings.
    for gap in &coverage_gaps {
        warnings.push(Warning::coverage(gap.clone()));
    }
    let ordered = order_warnings(warnings);
    let disclosures: Vec<String> = ordered.into_iter().map(|w| w.message).collect();

    let total_confidence = if packs.is_empty() {
        0.0
    } else {
        packs.iter().map(|p| p.confidence).sum::<f32>() / packs.len() as f32
    };

    Ok(QueryResponse {
        packs,
        total_confidence,
        cache_hit: false,
        latency_ms: started.elapsed().as_millis() as u64,
        version: fingerprint.clone(),
        disclosures,
        drill_down_hints: Vec::new(),
        method_hints: vec![format!("classified as {mode:?}")],
        coverage_gaps,
        synthesis_mode,
        synthesis,
        llm_error,
        selected_provider,
        selection_source,
    })
}

#[allow(clippy::too_many_arguments)]
fn build_pack(
    pack_id: String,
    pack_type: &str,
    target_path: PathBuf,
    summary: String,
    related_files: Vec<PathBuf>,
    confidence: f32,
    fingerprint: &VersionFingerprint,
) -> ContextPack {
    ContextPack {
        pack_id: pack_id.clone(),
        pack_type: pack_type.to_string(),
        target_id: EntityId::new(&["pack", &pack_id]),
        summary,
        key_facts: Vec::new(),
        related_files,
        code_snippets: Vec::new(),
        confidence,
        created_at: fingerprint.indexed_at,
        version: fingerprint.clone(),
    }
}

pub fn stats_snapshot(store: &Store) -> anyhow::Result<StoreStats> {
    store.get_stats()
}
