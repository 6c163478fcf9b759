//! Bootstrap Quality gate: bootstraps a fixture workspace and checks the
//! resulting store looks like a real index, not an empty shell.

use std::path::Path;
use std::time::Instant;

use librarian_bootstrap::{BootstrapOptions, Git2Probe, VersionControlProbe};
use librarian_core::VersionFingerprint;
use librarian_events::EventBus;
use librarian_query::{run_query, Depth, QueryRequest, Requirement, SelectionSource};
use librarian_store::Store;

use crate::gate::GateResult;

pub struct Fixture<'a> {
    pub name: &'a str,
    pub workspace: &'a Path,
    pub expected_files: u64,
}

pub async fn run(fixtures: &[Fixture<'_>], max_duration_ms: u64) -> anyhow::Result<GateResult> {
    let mut result = GateResult::new("bootstrap_quality");

    for fixture in fixtures {
        let started = Instant::now();
        let events = EventBus::new();
        let probe = Git2Probe;
        let report =
            librarian_bootstrap::run(fixture.workspace, &probe, BootstrapOptions::default(), &events).await?;

        if report.files_indexed != fixture.expected_files {
            result.finding(
                fixture.name,
                format!("indexed {} files, expected {}", report.files_indexed, fixture.expected_files),
            );
        }
        if report.functions_indexed > 0 && report.edges_indexed == 0 {
            result.finding(fixture.name, "call graph has zero edges despite functions being present");
        }

        let fingerprint = VersionFingerprint {
            schema_major: VersionFingerprint::CURRENT_MAJOR,
            schema_minor: VersionFingerprint::CURRENT_MINOR,
            schema_patch: 0,
            quality_tier: librarian_core::QualityTier::Partial,
            indexed_at: chrono::Utc::now(),
            head_commit: probe.current_head(fixture.workspace),
        };
        let store = Store::open(fixture.workspace, &fingerprint)?;
        let request = QueryRequest {
            intent: "list all functions".to_string(),
            depth: Depth::L0,
            llm_requirement: Requirement::Disabled,
            embedding_requirement: Requirement::Disabled,
            ..QueryRequest::default()
        };
        let response = run_query(&request, &store, &fingerprint, false, false, None, None, None, SelectionSource::Default).await?;
        if response.packs.is_empty() && report.files_indexed > 0 {
            result.finding(fixture.name, "generic intent returned zero packs");
        }

        result.record(fixture.name, started.elapsed(), max_duration_ms);
    }

    Ok(result)
}
