//! CLI command implementations, wiring the library crates to the
//! external interface described in the workspace state layout and CLI
//! surface: `bootstrap`, `query`, `diagnose`, `providers check`,
//! `external-repos sync`.

use std::path::{Path, PathBuf};

use chrono::Utc;
use librarian_bootstrap::{BootstrapOptions, Git2Probe, VersionControlProbe};
use librarian_core::{paths, QualityTier, StoreStats, VersionFingerprint};
use librarian_events::EventBus;
use librarian_providers::{CapabilityProbe, LlmProvider};
use librarian_query::pipeline::{Depth, QueryRequest, QueryResponse, Requirement, SelectionSource};
use librarian_query::sanitize::sanitize_prose;
use librarian_query::session::QuerySession;
use librarian_store::Store;
use serde::{Deserialize, Serialize};

use crate::Strategy;

fn current_fingerprint(workspace: &Path, probe: &dyn VersionControlProbe) -> VersionFingerprint {
    VersionFingerprint {
        schema_major: VersionFingerprint::CURRENT_MAJOR,
        schema_minor: VersionFingerprint::CURRENT_MINOR,
        schema_patch: 0,
        quality_tier: QualityTier::Partial,
        indexed_at: Utc::now(),
        head_commit: probe.current_head(workspace),
    }
}

/// A small, deterministic sample of workspace-relative files for the
/// drift detector's spot-check, per its own doc comment on why it
/// doesn't re-hash everything on every query.
fn sample_paths(workspace: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let files = librarian_bootstrap::discover_files(workspace, &[])?;
    Ok(files.iter().take(5).map(|p| p.strip_prefix(workspace).unwrap_or(p).to_path_buf()).collect())
}

fn provider_api_key(name: &str) -> Option<String> {
    match name {
        "openai" => std::env::var("OPENAI_API_KEY").ok(),
        "anthropic" => std::env::var("ANTHROPIC_API_KEY").ok(),
        _ => None,
    }
}

/// Builds the configured provider list in preference order: an explicit
/// session preference first, then openai, anthropic, local. `local`
/// always constructs successfully and is the backstop.
fn configured_providers(preferred: Option<&str>) -> Vec<Box<dyn LlmProvider>> {
    let mut order = vec!["openai", "anthropic", "local"];
    if let Some(p) = preferred {
        order.retain(|n| *n != p);
        order.insert(0, p);
    }
    order.into_iter().filter_map(|name| librarian_providers::create_llm_provider(name, provider_api_key(name)).ok()).collect()
}

const SELECTED_PROVIDER_ENV: &str = "LIBRARIAN_SELECTED_PROVIDER";

/// Propagates the selected provider into the process environment for the
/// duration of a query call so downstream capability shims can observe it,
/// restoring whatever was there before on drop (success, error, or panic
/// unwind alike) — mirrors the session surface's `FileMonitor::with_monitoring`
/// stop-guard.
struct ProviderEnvGuard {
    previous: Option<String>,
}

impl ProviderEnvGuard {
    fn set(provider: &str) -> Self {
        let previous = std::env::var(SELECTED_PROVIDER_ENV).ok();
        std::env::set_var(SELECTED_PROVIDER_ENV, provider);
        Self { previous }
    }
}

impl Drop for ProviderEnvGuard {
    fn drop(&mut self) {
        match &self.previous {
            Some(value) => std::env::set_var(SELECTED_PROVIDER_ENV, value),
            None => std::env::remove_var(SELECTED_PROVIDER_ENV),
        }
    }
}

pub async fn bootstrap(workspace: &Path, force: bool) -> anyhow::Result<()> {
    let events = EventBus::new();
    let probe = Git2Probe;
    let options = BootstrapOptions { force, ..Default::default() };
    let report = librarian_bootstrap::run(workspace, &probe, options, &events).await?;

    println!(
        "indexed {} files, {} functions, {} edges",
        report.files_indexed, report.functions_indexed, report.edges_indexed
    );
    if report.is_self_referential {
        println!("note: this workspace is librarian's own source tree");
    }
    for warning in &report.warnings {
        eprintln!("warning: {}", sanitize_prose(warning));
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub async fn query(
    workspace: &Path,
    intent: String,
    strategy: Strategy,
    limit: usize,
    session_arg: Option<String>,
    drill_down: Option<String>,
    files: Option<String>,
    no_bootstrap: bool,
    json: bool,
    out: Option<PathBuf>,
) -> anyhow::Result<()> {
    let probe = Git2Probe;
    let expected = current_fingerprint(workspace, &probe);

    let sample = sample_paths(workspace)?;
    let source_files_exist = !librarian_bootstrap::discover_files(workspace, &[])?.is_empty();
    let mut drift = librarian_bootstrap::check_drift(workspace, &expected, &probe, &sample, source_files_exist)?;

    if drift.required && !no_bootstrap {
        tracing::info!("knowledge store drift detected ({}), bootstrapping", drift.reason);
        let events = EventBus::new();
        librarian_bootstrap::run(workspace, &probe, BootstrapOptions::default(), &events).await?;
        drift.required = false;
    }

    let store = Store::open(workspace, &expected)?;

    let mut session = match session_arg.as_deref() {
        None | Some("new") => QuerySession::new(uuid::Uuid::new_v4().to_string()),
        Some(id) => QuerySession::load(workspace, id)?,
    };

    let affected_files: Vec<PathBuf> = files.map(|f| f.split(',').map(PathBuf::from).collect()).unwrap_or_default();

    let effective_intent = match &drill_down {
        Some(path) => QuerySession::drill_down_intent(path),
        None => intent,
    };
    session.record_intent(&effective_intent);

    let (llm_requirement, embedding_requirement) = match strategy {
        Strategy::Heuristic => (Requirement::Disabled, Requirement::Disabled),
        Strategy::Semantic => (Requirement::Required, Requirement::Required),
        Strategy::Auto => (Requirement::Optional, Requirement::Optional),
    };

    let request = QueryRequest {
        intent: effective_intent,
        depth: Depth::L0,
        affected_files,
        llm_requirement,
        embedding_requirement,
        timeout_ms: 10_000,
        deterministic: true,
        limit,
    };

    let session_preference = session.llm_selection.as_ref().map(|s| s.provider.clone());
    let providers = configured_providers(session_preference.as_deref());

    let mut probes = Vec::with_capacity(providers.len());
    if llm_requirement != Requirement::Disabled {
        for provider in &providers {
            probes.push(provider.probe().await);
        }
    }
    let readiness = (llm_requirement != Requirement::Disabled).then(|| librarian_providers::fold_readiness(&probes));
    let llm: Option<&dyn LlmProvider> = match &readiness {
        Some(r) if r.ready => providers.iter().find(|p| Some(p.name().to_string()) == r.selected_provider).map(|p| p.as_ref()),
        _ => None,
    };

    let selected_provider = readiness.as_ref().and_then(|r| r.selected_provider.clone());
    let selection_source = match &selected_provider {
        Some(p) if session_preference.as_deref() == Some(p.as_str()) => SelectionSource::Session,
        Some(_) => SelectionSource::Probe,
        None => SelectionSource::Default,
    };

    let response = {
        // Scoped to this call only: restored as soon as run_query returns,
        // on the success path or via `?`.
        let _env_guard = selected_provider.as_deref().map(ProviderEnvGuard::set);
        librarian_query::run_query(
            &request,
            &store,
            &expected,
            drift.required,
            !no_bootstrap,
            readiness.as_ref(),
            llm,
            selected_provider.clone(),
            selection_source,
        )
        .await?
    };

    if let Some(selected) = &selected_provider {
        let model_id = probes.iter().find(|p| p.provider == *selected).and_then(|p| p.model_id.clone());
        session.set_llm_selection(selected.clone(), model_id);
    }
    session.save(workspace)?;

    emit_query_response(&response, &session.session_id, json, out)
}

fn emit_query_response(response: &QueryResponse, session_id: &str, json: bool, out: Option<PathBuf>) -> anyhow::Result<()> {
    if json {
        let rendered = serde_json::to_string_pretty(response)?;
        match out {
            Some(path) => std::fs::write(path, rendered)?,
            None => println!("{rendered}"),
        }
        return Ok(());
    }

    println!("session: {session_id}");
    if let Some(provider) = &response.selected_provider {
        println!("provider: {provider} (source: {:?})", response.selection_source);
    }
    println!("{} context pack(s), confidence {:.2}, {}ms", response.packs.len(), response.total_confidence, response.latency_ms);
    for pack in &response.packs {
        println!("- [{:.2}] {}: {}", pack.confidence, pack.pack_id, pack.summary);
    }
    if let Some(synthesis) = &response.synthesis {
        println!("\n{synthesis}");
    }
    for disclosure in &response.disclosures {
        println!("! {disclosure}");
    }
    for gap in &response.coverage_gaps {
        println!("~ {gap}");
    }
    Ok(())
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ConfigSummary {
    workspace: String,
    ecosystem: Option<String>,
    openai_key_set: bool,
    anthropic_key_set: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DiagnosisReport {
    bootstrapped: bool,
    drift_required: bool,
    drift_reason: String,
    stats: StoreStats,
    healed: bool,
    config: Option<ConfigSummary>,
}

pub async fn diagnose(workspace: &Path, show_config: bool, heal: bool, pretty: bool, format: &str) -> anyhow::Result<()> {
    let probe = Git2Probe;
    let expected = current_fingerprint(workspace, &probe);
    let sample = sample_paths(workspace)?;
    let source_files_exist = !librarian_bootstrap::discover_files(workspace, &[])?.is_empty();
    let mut drift = librarian_bootstrap::check_drift(workspace, &expected, &probe, &sample, source_files_exist)?;

    let mut healed = false;
    if heal && drift.required {
        let events = EventBus::new();
        librarian_bootstrap::run(workspace, &probe, BootstrapOptions { force: true, ..Default::default() }, &events).await?;
        drift = librarian_bootstrap::check_drift(workspace, &expected, &probe, &sample, source_files_exist)?;
        healed = true;
    }

    let bootstrapped = paths::db_path(workspace).is_file();
    let stats = if bootstrapped { Store::open(workspace, &expected)?.get_stats()? } else { StoreStats::default() };

    let config = show_config.then(|| ConfigSummary {
        workspace: workspace.display().to_string(),
        ecosystem: librarian_core::detect_ecosystem(workspace).map(|e| format!("{e:?}")),
        openai_key_set: std::env::var("OPENAI_API_KEY").is_ok(),
        anthropic_key_set: std::env::var("ANTHROPIC_API_KEY").is_ok(),
    });

    let report = DiagnosisReport {
        bootstrapped,
        drift_required: drift.required,
        drift_reason: sanitize_prose(&drift.reason),
        stats,
        healed,
        config,
    };

    if format == "json" {
        let rendered = if pretty { serde_json::to_string_pretty(&report)? } else { serde_json::to_string(&report)? };
        println!("{rendered}");
    } else {
        println!("bootstrapped: {}", report.bootstrapped);
        println!("drift required: {}", report.drift_required);
        if report.drift_required {
            println!("reason: {}", report.drift_reason);
        }
        println!(
            "files: {} functions: {} modules: {} edges: {} embedding coverage: {:.2}",
            report.stats.total_files,
            report.stats.total_functions,
            report.stats.total_modules,
            report.stats.total_edges,
            report.stats.embedding_ratio()
        );
        if let Some(cfg) = &report.config {
            println!("workspace: {}", cfg.workspace);
            println!("ecosystem: {:?}", cfg.ecosystem);
            println!("openai key set: {} anthropic key set: {}", cfg.openai_key_set, cfg.anthropic_key_set);
        }
        if report.healed {
            println!("healed: re-bootstrapped successfully");
        }
    }

    Ok(())
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProvidersCheckReport {
    ready: bool,
    selected_provider: Option<String>,
    providers: Vec<CapabilityProbe>,
    remediation_steps: Vec<String>,
}

pub async fn providers_check(json: bool, out: Option<PathBuf>) -> anyhow::Result<()> {
    let providers = configured_providers(None);
    let mut probes = Vec::with_capacity(providers.len());
    for provider in &providers {
        probes.push(provider.probe().await);
    }
    let readiness = librarian_providers::fold_readiness(&probes);

    let report = ProvidersCheckReport {
        ready: readiness.ready,
        selected_provider: readiness.selected_provider.clone(),
        providers: probes,
        remediation_steps: readiness.remediation_steps.clone(),
    };

    if json {
        let rendered = serde_json::to_string_pretty(&report)?;
        match out {
            Some(path) => std::fs::write(path, rendered)?,
            None => println!("{rendered}"),
        }
    } else {
        println!("ready: {}", report.ready);
        if let Some(selected) = &report.selected_provider {
            println!("selected provider: {selected}");
        }
        for probe in &report.providers {
            println!("  {} available={} authenticated={}", probe.provider, probe.available, probe.authenticated);
        }
        for step in &report.remediation_steps {
            println!("  remediation: {step}");
        }
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
struct RepoManifestEntry {
    name: String,
    remote: String,
    commit: String,
}

#[derive(Debug, Deserialize)]
struct RepoManifest {
    repos: Vec<RepoManifestEntry>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RepoSyncResult {
    name: String,
    remote: String,
    commit: String,
    synced_commit: String,
    verified: Option<bool>,
}

pub fn external_repos_sync(workspace: &Path, repos_root: Option<PathBuf>, verify: bool, json: bool) -> anyhow::Result<()> {
    let manifest_path = workspace.join("external-repos.json");
    let raw = std::fs::read_to_string(&manifest_path)
        .map_err(|e| anyhow::anyhow!("failed to read manifest {}: {e}", manifest_path.display()))?;
    let manifest: RepoManifest = serde_json::from_str(&raw)?;

    let root = repos_root.unwrap_or_else(|| workspace.join("vendor/external-repos"));
    std::fs::create_dir_all(&root)?;

    let mut results = Vec::with_capacity(manifest.repos.len());
    for repo in &manifest.repos {
        let dest = root.join(&repo.name);
        let repository =
            if dest.join(".git").is_dir() { git2::Repository::open(&dest)? } else { git2::Repository::clone(&repo.remote, &dest)? };

        let oid = git2::Oid::from_str(&repo.commit)?;
        let object = repository.find_object(oid, None)?;
        repository.checkout_tree(&object, None)?;
        repository.set_head_detached(oid)?;

        let synced_commit = repository.head()?.target().map(|o| o.to_string()).unwrap_or_default();
        let verified = verify.then(|| dest.read_dir().map(|mut entries| entries.next().is_some()).unwrap_or(false));

        results.push(RepoSyncResult { name: repo.name.clone(), remote: repo.remote.clone(), commit: repo.commit.clone(), synced_commit, verified });
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        for result in &results {
            println!("{}: synced to {} (expected {})", result.name, result.synced_commit, result.commit);
            if let Some(verified) = result.verified {
                println!("  verified: {verified}");
            }
        }
    }

    Ok(())
}
