//! Query Relevance gate: for a fixture, runs a list of
//! (intent, expected files, expected concepts) triples and checks
//! coverage ratios against the packs the pipeline actually returns.

use std::path::{Path, PathBuf};
use std::time::Instant;

use librarian_core::VersionFingerprint;
use librarian_query::{run_query, Depth, QueryRequest, Requirement, SelectionSource};
use librarian_store::Store;

use crate::gate::GateResult;

pub struct RelevanceCase<'a> {
    pub intent: &'a str,
    pub expected_files: &'a [PathBuf],
    pub expected_concepts: &'a [&'a str],
    pub min_coverage: f32,
}

pub async fn run(
    workspace: &Path,
    fingerprint: &VersionFingerprint,
    cases: &[RelevanceCase<'_>],
    max_duration_ms: u64,
) -> anyhow::Result<GateResult> {
    let mut result = GateResult::new("query_relevance");
    let store = Store::open(workspace, fingerprint)?;

    for case in cases {
        let started = Instant::now();
        let request = QueryRequest {
            intent: case.intent.to_string(),
            depth: Depth::L1,
            llm_requirement: Requirement::Disabled,
            embedding_requirement: Requirement::Optional,
            ..QueryRequest::default()
        };
        let response = run_query(&request, &store, fingerprint, false, false, None, None, None, SelectionSource::Default).await?;

        let returned_files: Vec<&PathBuf> = response.packs.iter().flat_map(|p| p.related_files.iter()).collect();
        let file_hits = case.expected_files.iter().filter(|f| returned_files.contains(f)).count();
        let file_coverage =
            if case.expected_files.is_empty() { 1.0 } else { file_hits as f32 / case.expected_files.len() as f32 };

        let haystack = response.packs.iter().map(|p| p.summary.to_lowercase()).collect::<Vec<_>>().join(" ");
        let concept_hits =
            case.expected_concepts.iter().filter(|c| haystack.contains(&c.to_lowercase())).count();
        let concept_coverage = if case.expected_concepts.is_empty() {
            1.0
        } else {
            concept_hits as f32 / case.expected_concepts.len() as f32
        };

        let coverage = file_coverage.min(concept_coverage);
        if coverage < case.min_coverage {
            result.finding(
                case.intent,
                format!("coverage {coverage:.2} below minimum {:.2} (files {file_coverage:.2}, concepts {concept_coverage:.2})", case.min_coverage),
            );
        }

        result.record(case.intent, started.elapsed(), max_duration_ms);
    }

    Ok(result)
}
