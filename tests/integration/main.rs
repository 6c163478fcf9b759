//! Integration tests exercising the library crates together: bootstrap +
//! drift, citation correction, sanitization, the strategy gate, incident
//! attribution, and query session continuation.

use std::path::{Path, PathBuf};
use std::process::Command;

use chrono::Utc;
use librarian_bootstrap::{BootstrapOptions, Git2Probe, VersionControlProbe};
use librarian_core::{Checksum, EntityId, File, FileCategory, Function, QualityTier, VersionFingerprint};
use librarian_events::EventBus;
use librarian_query::pipeline::{Depth, QueryRequest, Requirement};
use librarian_query::sanitize::{sanitize_id, sanitize_prose};
use librarian_store::Store;
use librarian_verify::citation::extract_citations;
use librarian_verify::correction::suggest_correction;

fn fingerprint(workspace: &Path, probe: &dyn VersionControlProbe) -> VersionFingerprint {
    VersionFingerprint {
        schema_major: VersionFingerprint::CURRENT_MAJOR,
        schema_minor: VersionFingerprint::CURRENT_MINOR,
        schema_patch: 0,
        quality_tier: QualityTier::Partial,
        indexed_at: Utc::now(),
        head_commit: probe.current_head(workspace),
    }
}

fn commit_all(repo: &git2::Repository, message: &str) -> git2::Oid {
    let mut index = repo.index().unwrap();
    index.add_all(["."].iter(), git2::IndexAddOption::DEFAULT, None).unwrap();
    index.write().unwrap();
    let tree_id = index.write_tree().unwrap();
    let tree = repo.find_tree(tree_id).unwrap();
    let sig = git2::Signature::now("Test", "test@example.com").unwrap();
    let parents: Vec<git2::Commit> = match repo.head().ok().and_then(|h| h.target()) {
        Some(oid) => vec![repo.find_commit(oid).unwrap()],
        None => Vec::new(),
    };
    let parent_refs: Vec<&git2::Commit> = parents.iter().collect();
    repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parent_refs).unwrap()
}

/// Scenario 1: drift after a branch switch forces a required re-bootstrap,
/// and a follow-up query still returns results once it's rebuilt.
#[tokio::test]
async fn drift_after_branch_switch_requires_rebootstrap() {
    let dir = tempfile::tempdir().unwrap();
    let workspace = dir.path();
    let repo = git2::Repository::init(workspace).unwrap();
    std::fs::write(workspace.join("lib.rs"), "fn query_pipeline_architecture() {}\n").unwrap();
    commit_all(&repo, "initial");

    let probe = Git2Probe;
    let events = EventBus::new();
    let expected = fingerprint(workspace, &probe);

    librarian_bootstrap::run(workspace, &probe, BootstrapOptions::default(), &events).await.unwrap();

    // Branch switch + new commit moves HEAD.
    let head_commit = repo.head().unwrap().peel_to_commit().unwrap();
    repo.branch("feature", &head_commit, false).unwrap();
    repo.set_head("refs/heads/feature").unwrap();
    std::fs::write(workspace.join("lib.rs"), "fn query_pipeline_architecture() { /* changed */ }\n").unwrap();
    commit_all(&repo, "on feature branch");

    let sample = vec![PathBuf::from("lib.rs")];
    let drift = librarian_bootstrap::check_drift(workspace, &expected, &probe, &sample, true).unwrap();
    assert!(drift.required);
    assert!(drift.reason.contains("git HEAD"));
    assert!(drift.reason.contains("Run `librarian bootstrap"));
    assert!(drift.reason.contains("--force"));

    librarian_bootstrap::run(workspace, &probe, BootstrapOptions { force: true, ..Default::default() }, &events).await.unwrap();
    let expected_after = fingerprint(workspace, &probe);
    let redrift = librarian_bootstrap::check_drift(workspace, &expected_after, &probe, &sample, true).unwrap();
    assert!(!redrift.required);

    let store = Store::open(workspace, &expected_after).unwrap();
    let request = QueryRequest { intent: "query pipeline architecture".to_string(), limit: 5, ..QueryRequest::default() };
    let response = librarian_query::run_query(&request, &store, &expected_after, false, true, None, None, None, librarian_query::SelectionSource::Default).await.unwrap();
    assert!(!response.packs.is_empty());
    assert_eq!(response.selected_provider, None);
    assert_eq!(response.selection_source, librarian_query::SelectionSource::Default);
}

/// Scenario 2: a misspelled file citation is corrected against the store,
/// and applying the correction replaces the wrong path with the right one.
#[test]
fn citation_correction_fixes_misspelled_filename() {
    let dir = tempfile::tempdir().unwrap();
    let workspace = dir.path();
    let expected = VersionFingerprint {
        schema_major: VersionFingerprint::CURRENT_MAJOR,
        schema_minor: VersionFingerprint::CURRENT_MINOR,
        schema_patch: 0,
        quality_tier: QualityTier::Partial,
        indexed_at: Utc::now(),
        head_commit: None,
    };
    let mut store = Store::open(workspace, &expected).unwrap();
    let checksum = Checksum(1);
    store
        .transaction(|tx| {
            librarian_store::store::upsert_file_tx(
                tx,
                &File {
                    path: PathBuf::from("test_file.ts"),
                    checksum,
                    category: FileCategory::Test,
                    role: String::new(),
                    imports: Vec::new(),
                    imported_by: Vec::new(),
                },
            )?;
            librarian_store::store::upsert_function_tx(
                tx,
                &Function {
                    id: EntityId::for_function(&checksum, "test_file.ts::runs"),
                    name: "runs".to_string(),
                    file_path: PathBuf::from("test_file.ts"),
                    start_line: 25,
                    end_line: 30,
                    signature: "() -> void".to_string(),
                    purpose: String::new(),
                    confidence: 0.9,
                },
            )
        })
        .unwrap();

    let response = "See `test_flie.ts:25` for the implementation.";
    let citations = extract_citations(response);
    let target = citations.iter().find(|c| c.file.as_deref() == Some("test_flie.ts")).expect("citation extracted");

    let correction = suggest_correction(target, &store).unwrap().expect("a correction is suggested");
    assert_eq!(correction.suggested_file.as_deref(), Some("test_file.ts"));

    let corrected = response.replace("test_flie.ts", correction.suggested_file.as_deref().unwrap());
    assert!(corrected.contains("test_file.ts"));
    assert!(!corrected.contains("test_flie.ts"));
}

/// Scenario 3: sanitization strips the internal trace marker from both
/// prose and id-like fields before anything reaches a user.
#[test]
fn sanitization_strips_internal_trace_markers() {
    let disclosure = "unverified_by_trace(storage_write_degraded): Session degraded due to lock contention.";
    assert_eq!(sanitize_prose(disclosure), "Session degraded due to lock contention.");

    let trace_id = "unverified_by_trace(replay_unavailable)";
    assert_eq!(sanitize_id(trace_id), "replay_unavailable");
}

/// Scenario 4: the strategy gate rejects low embedding coverage under
/// `semantic` but succeeds under `heuristic`, which disables both.
#[tokio::test]
async fn strategy_gate_rejects_semantic_under_low_coverage() {
    let dir = tempfile::tempdir().unwrap();
    let workspace = dir.path();
    let expected = VersionFingerprint {
        schema_major: VersionFingerprint::CURRENT_MAJOR,
        schema_minor: VersionFingerprint::CURRENT_MINOR,
        schema_patch: 0,
        quality_tier: QualityTier::Partial,
        indexed_at: Utc::now(),
        head_commit: None,
    };
    let store = Store::open(workspace, &expected).unwrap();
    assert_eq!(store.embedding_coverage().unwrap(), 0.0);

    let semantic_request = QueryRequest {
        intent: "how does auth work".to_string(),
        embedding_requirement: Requirement::Required,
        llm_requirement: Requirement::Disabled,
        depth: Depth::L0,
        ..QueryRequest::default()
    };
    let err = librarian_query::run_query(&semantic_request, &store, &expected, false, true, None, None, None, librarian_query::SelectionSource::Default).await.unwrap_err();
    assert!(err.downcast_ref::<librarian_core::LibrarianError>().map(|e| e.code() == "INSUFFICIENT_EMBEDDING_COVERAGE").unwrap_or(false));

    let heuristic_request = QueryRequest {
        intent: "how does auth work".to_string(),
        embedding_requirement: Requirement::Disabled,
        llm_requirement: Requirement::Disabled,
        depth: Depth::L0,
        ..QueryRequest::default()
    };
    let response = librarian_query::run_query(&heuristic_request, &store, &expected, false, true, None, None, None, librarian_query::SelectionSource::Default).await.unwrap();
    assert_eq!(response.synthesis_mode, librarian_query::pipeline::SynthesisMode::Heuristic);
}

/// Scenario 5: stack frames from mixed formats all attribute to the
/// functions whose line ranges contain them.
#[test]
fn incident_attribution_maps_every_frame_to_a_function() {
    let dir = tempfile::tempdir().unwrap();
    let workspace = dir.path();
    let expected = VersionFingerprint {
        schema_major: VersionFingerprint::CURRENT_MAJOR,
        schema_minor: VersionFingerprint::CURRENT_MINOR,
        schema_patch: 0,
        quality_tier: QualityTier::Partial,
        indexed_at: Utc::now(),
        head_commit: None,
    };
    let mut store = Store::open(workspace, &expected).unwrap();
    let checksum_a = Checksum(10);
    let checksum_b = Checksum(20);
    store
        .transaction(|tx| {
            librarian_store::store::upsert_file_tx(
                tx,
                &File { path: PathBuf::from("src/a.ts"), checksum: checksum_a, category: FileCategory::Code, role: String::new(), imports: Vec::new(), imported_by: Vec::new() },
            )?;
            librarian_store::store::upsert_file_tx(
                tx,
                &File { path: PathBuf::from("src/b.ts"), checksum: checksum_b, category: FileCategory::Code, role: String::new(), imports: Vec::new(), imported_by: Vec::new() },
            )?;
            librarian_store::store::upsert_function_tx(
                tx,
                &Function {
                    id: EntityId::for_function(&checksum_a, "src/a.ts::fn_a_1"),
                    name: "fn_a_1".to_string(),
                    file_path: PathBuf::from("src/a.ts"),
                    start_line: 10,
                    end_line: 20,
                    signature: String::new(),
                    purpose: String::new(),
                    confidence: 0.9,
                },
            )?;
            librarian_store::store::upsert_function_tx(
                tx,
                &Function {
                    id: EntityId::for_function(&checksum_a, "src/a.ts::fn_a_2"),
                    name: "fn_a_2".to_string(),
                    file_path: PathBuf::from("src/a.ts"),
                    start_line: 25,
                    end_line: 40,
                    signature: String::new(),
                    purpose: String::new(),
                    confidence: 0.9,
                },
            )?;
            librarian_store::store::upsert_function_tx(
                tx,
                &Function {
                    id: EntityId::for_function(&checksum_b, "src/b.ts::fn_b_1"),
                    name: "fn_b_1".to_string(),
                    file_path: PathBuf::from("src/b.ts"),
                    start_line: 1,
                    end_line: 10,
                    signature: String::new(),
                    purpose: String::new(),
                    confidence: 0.9,
                },
            )
        })
        .unwrap();

    let trace = "at doThing (/repo/src/a.ts:12:3)\n  File \"/repo/src/a.ts\", line 30, in h\nsrc/b.ts:5";
    let report = librarian_session::attribute(Path::new("/repo"), trace, &store).unwrap();

    assert_eq!(report.frames.len(), 3);
    assert_eq!(report.all_function_ids.len(), 3);
    assert!(report.frames.iter().all(|f| !f.function_ids.is_empty()));
    assert_eq!(report.summary.parsed_frame_count, 4);
    assert_eq!(report.summary.normalized_frame_count, 3);
    assert_eq!(report.summary.attributed_frame_count, 3);
    assert_eq!(report.summary.unattributed_frame_count, 0);

    let expected_order = vec![
        EntityId::for_function(&checksum_a, "src/a.ts::fn_a_1"),
        EntityId::for_function(&checksum_a, "src/a.ts::fn_a_2"),
        EntityId::for_function(&checksum_b, "src/b.ts::fn_b_1"),
    ];
    assert_eq!(report.all_function_ids, expected_order);
}

/// Scenario 6: a query session persists history across a follow-up and a
/// drill-down records the synthetic "Drill down: <path>" intent.
#[test]
fn query_session_persists_history_across_followups() {
    let dir = tempfile::tempdir().unwrap();
    let workspace = dir.path();

    let mut session = librarian_query::session::QuerySession::new("continuation-test");
    session.record_intent("auth overview");
    session.set_llm_selection("codex".to_string(), Some("gpt-5-codex".to_string()));
    session.save(workspace).unwrap();

    let mut reloaded = librarian_query::session::QuerySession::load(workspace, "continuation-test").unwrap();
    assert_eq!(reloaded.history, vec!["auth overview".to_string()]);
    assert_eq!(reloaded.llm_selection.as_ref().map(|s| s.provider.as_str()), Some("codex"));
    assert_eq!(reloaded.llm_selection.as_ref().and_then(|s| s.model_id.clone()), Some("gpt-5-codex".to_string()));

    let drill_down = librarian_query::session::QuerySession::drill_down_intent("src/auth/mod.rs");
    assert_eq!(drill_down, "Drill down: src/auth/mod.rs");
    reloaded.record_intent(&drill_down);
    reloaded.save(workspace).unwrap();

    let final_session = librarian_query::session::QuerySession::load(workspace, "continuation-test").unwrap();
    assert_eq!(final_session.history, vec!["auth overview".to_string(), "Drill down: src/auth/mod.rs".to_string()]);
}

/// Smoke test: the binary parses `--help` and names itself appropriately.
#[test]
fn cli_help_invokes_without_panicking() {
    let output = Command::new(env!("CARGO_BIN_EXE_librarian")).arg("--help").output().expect("failed to execute binary");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("librarian"));
}
