//! Self-Index Durability gate: bootstraps a seed repo, mutates its git
//! history in one of three ways, and checks the drift detector catches
//! it — then that a forced re-bootstrap clears the drift.

use std::path::Path;
use std::time::Instant;

use librarian_bootstrap::{check_drift, BootstrapOptions, VersionControlProbe};
use librarian_core::VersionFingerprint;

use crate::gate::GateResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scenario {
    BranchSwitch,
    Rebase,
    HistoryRewrite,
}

impl Scenario {
    fn label(self) -> &'static str {
        match self {
            Scenario::BranchSwitch => "branch_switch",
            Scenario::Rebase => "rebase",
            Scenario::HistoryRewrite => "history_rewrite",
        }
    }
}

/// `mutate` performs the scenario's git-history mutation against `workspace`
/// (branch switch, rebase, or history rewrite) before the drift re-check —
/// the gate doesn't shell out to git itself so callers can fixture it.
pub async fn run(
    workspace: &Path,
    scenarios: &[(Scenario, Box<dyn Fn(&Path) -> anyhow::Result<()> + Send + Sync>)],
    probe: &dyn VersionControlProbe,
    max_duration_ms: u64,
) -> anyhow::Result<GateResult> {
    let mut result = GateResult::new("self_index_durability");

    for (scenario, mutate) in scenarios {
        let started = Instant::now();
        let label = scenario.label();

        let events = librarian_events::EventBus::new();
        librarian_bootstrap::run(workspace, probe, BootstrapOptions::default(), &events).await?;

        let fingerprint = VersionFingerprint {
            schema_major: VersionFingerprint::CURRENT_MAJOR,
            schema_minor: VersionFingerprint::CURRENT_MINOR,
            schema_patch: 0,
            quality_tier: librarian_core::QualityTier::Partial,
            indexed_at: chrono::Utc::now(),
            head_commit: probe.current_head(workspace),
        };

        if let Err(e) = mutate(workspace) {
            result.finding(label, format!("scenario mutation failed: {e}"));
            continue;
        }

        let drift = check_drift(workspace, &fingerprint, probe, &[], true)?;
        if !drift.required {
            result.finding(label, "drift check reported required=false after history mutation");
        } else {
            if !drift.reason.contains("git HEAD") {
                result.finding(label, "drift reason is missing the required 'git HEAD' phrase");
            }
            if !drift.reason.contains("Run `librarian bootstrap") || !drift.reason.contains("--force") {
                result.finding(label, "drift reason is missing the required re-index phrase");
            }
        }

        let reindexed_fingerprint = VersionFingerprint { head_commit: probe.current_head(workspace), ..fingerprint };
        librarian_bootstrap::run(workspace, probe, BootstrapOptions { force: true, ..Default::default() }, &events)
            .await?;
        let post_check = check_drift(workspace, &reindexed_fingerprint, probe, &[], true)?;
        if post_check.required {
            result.finding(label, format!("drift still required after forced re-bootstrap: {}", post_check.reason));
        }

        result.record(label, started.elapsed(), max_duration_ms);
    }

    Ok(result)
}
