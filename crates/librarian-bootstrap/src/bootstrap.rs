//! Bootstrap algorithm: turn a workspace into a populated Knowledge Store.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use librarian_core::{
    checksum_bytes, is_self_referential, Checksum, Directory, DirectoryRole, EdgeKind, EntityId, EntityKind, File,
    FileCategory, Function, GraphEdge, Module, QualityTier, VersionFingerprint,
};
use librarian_events::{Event, EventBus};
use librarian_extract::{FactDetails, FactExtractorRegistry, ParserPool, StructuralFact};
use librarian_store::Store;

use crate::vcs::VersionControlProbe;
use crate::walk::discover_files;

pub struct BootstrapOptions {
    pub force: bool,
    pub extra_excludes: Vec<String>,
    pub max_concurrent_files: usize,
}

impl Default for BootstrapOptions {
    fn default() -> Self {
        Self { force: false, extra_excludes: Vec::new(), max_concurrent_files: 6 }
    }
}

#[derive(Debug, Default)]
pub struct BootstrapReport {
    pub files_indexed: u64,
    pub functions_indexed: u64,
    pub edges_indexed: u64,
    pub warnings: Vec<String>,
    pub is_self_referential: bool,
}

/// Drives C1 over discovered files and writes the result through C2,
/// one transaction per file, per §4.3 step 3.
pub async fn run(
    workspace: &Path,
    probe: &dyn VersionControlProbe,
    options: BootstrapOptions,
    events: &EventBus,
) -> anyhow::Result<BootstrapReport> {
    let started = Instant::now();
    events.publish(Event::BootstrapStarted { workspace: workspace.to_path_buf() });

    let files = discover_files(workspace, &options.extra_excludes)?;
    let registry = Arc::new(FactExtractorRegistry::new(ParserPool::new(options.max_concurrent_files.max(2))));

    let expected = VersionFingerprint {
        schema_major: VersionFingerprint::CURRENT_MAJOR,
        schema_minor: VersionFingerprint::CURRENT_MINOR,
        schema_patch: 0,
        quality_tier: QualityTier::Partial,
        indexed_at: Utc::now(),
        head_commit: probe.current_head(workspace),
    };

    let mut store = Store::open(workspace, &expected)?;

    let mut report = BootstrapReport { is_self_referential: is_self_referential(workspace), ..Default::default() };
    let mut name_index: HashMap<String, EntityId> = HashMap::new();
    let mut per_file_facts: Vec<(PathBuf, Checksum, Vec<StructuralFact>)> = Vec::new();

    // Pass 1: per-file extraction and persistence of File/Function/Module rows.
    for path in &files {
        let rel = path.strip_prefix(workspace).unwrap_or(path).to_path_buf();
        let bytes = match std::fs::read(path) {
            Ok(b) => b,
            Err(e) => {
                report.warnings.push(format!("failed to read {}: {e}", rel.display()));
                continue;
            }
        };
        let checksum = checksum_bytes(&bytes);
        let outcome = registry.extract_file(path, &bytes).await;
        report.warnings.extend(outcome.warnings);

        let category = categorize(&rel);
        let mut exports = Vec::new();
        let mut dependencies = Vec::new();
        let mut functions = Vec::new();

        for fact in &outcome.facts {
            match &fact.details {
                FactDetails::FunctionDef(details) => {
                    let qualified = format!("{}::{}", rel.display(), fact.identifier);
                    let id = EntityId::for_function(&checksum, &qualified);
                    name_index.insert(fact.identifier.clone(), id);
                    let signature = format!(
                        "({}) -> {}",
                        details
                            .params
                            .iter()
                            .map(|(n, t)| if t.is_empty() { n.clone() } else { format!("{n}: {t}") })
                            .collect::<Vec<_>>()
                            .join(", "),
                        details.return_type.as_deref().unwrap_or("?")
                    );
                    functions.push(Function {
                        id,
                        name: fact.identifier.clone(),
                        file_path: rel.clone(),
                        start_line: fact.line,
                        end_line: fact.line,
                        signature,
                        purpose: String::new(),
                        confidence: if details.is_exported { 0.9 } else { 0.75 },
                    });
                    if details.is_exported {
                        exports.push(fact.identifier.clone());
                    }
                }
                FactDetails::Class(_) | FactDetails::Type(_) => {
                    exports.push(fact.identifier.clone());
                }
                FactDetails::Import(import) => {
                    dependencies.push(import.module.clone());
                }
                FactDetails::Export(export) => {
                    exports.push(export.exported_name.clone());
                }
                FactDetails::Call(_) => {}
            }
        }

        let file_record = File {
            path: rel.clone(),
            checksum,
            category,
            role: String::new(),
            imports: dependencies.iter().map(PathBuf::from).collect(),
            imported_by: Vec::new(),
        };
        let module_record = Module { path: rel.clone(), exports, dependencies, purpose: String::new() };

        store.transaction(|tx| {
            store_file(tx, &file_record)?;
            store_module(tx, &module_record)?;
            for function in &functions {
                store_function(tx, function)?;
            }
            Ok(())
        })?;

        report.files_indexed += 1;
        report.functions_indexed += functions.len() as u64;
        per_file_facts.push((rel, checksum, outcome.facts));
    }

    // Pass 2: best-effort edges now that every file's facts are known.
    let known_paths: std::collections::HashSet<PathBuf> = per_file_facts.iter().map(|(p, _, _)| p.clone()).collect();
    let mut edges = Vec::new();
    for (rel, _checksum, facts) in &per_file_facts {
        let from_id = EntityId::new(&["file", &rel.to_string_lossy()]);
        for fact in facts {
            match &fact.details {
                FactDetails::Import(import) => {
                    if let Some(target) = known_paths.iter().find(|p| p.ends_with(&import.module) || import.module.ends_with(&p.to_string_lossy().to_string())) {
                        let to_id = EntityId::new(&["file", &target.to_string_lossy()]);
                        edges.push(GraphEdge {
                            from: (from_id, EntityKind::File),
                            to: (to_id, EntityKind::File),
                            kind: EdgeKind::Imports,
                            source_file: rel.clone(),
                            confidence: 0.8,
                        });
                    }
                }
                FactDetails::Call(call) => {
                    if let Some(target_id) = name_index.get(&call.callee) {
                        edges.push(GraphEdge {
                            from: (from_id, EntityKind::File),
                            to: (*target_id, EntityKind::Function),
                            kind: EdgeKind::Calls,
                            source_file: rel.clone(),
                            confidence: 0.6,
                        });
                    }
                }
                _ => {}
            }
        }
    }

    if !edges.is_empty() {
        store.transaction(|tx| {
            for edge in &edges {
                store_edge(tx, edge)?;
            }
            Ok(())
        })?;
    }
    report.edges_indexed = edges.len() as u64;

    store.write_fingerprint(&expected)?;

    let root_dir = Directory { path: PathBuf::from("."), role: DirectoryRole::Root, purpose: String::new() };
    store.transaction(|tx| store_directory(tx, &root_dir))?;

    events.publish(Event::BootstrapCompleted {
        workspace: workspace.to_path_buf(),
        files_indexed: report.files_indexed,
        duration_ms: started.elapsed().as_millis() as u64,
    });

    Ok(report)
}

fn categorize(path: &Path) -> FileCategory {
    let name = path.to_string_lossy();
    if name.contains("test") || name.contains("spec") {
        FileCategory::Test
    } else if name.ends_with(".md") || name.contains("docs/") {
        FileCategory::Docs
    } else if name.ends_with(".json") || name.ends_with(".toml") || name.ends_with(".yaml") || name.ends_with(".yml") {
        FileCategory::Config
    } else if name.ends_with(".sql") {
        FileCategory::Schema
    } else {
        match path.extension().and_then(|e| e.to_str()) {
            Some(
                "rs" | "ts" | "tsx" | "js" | "jsx" | "py" | "go" | "java" | "c" | "cpp" | "h" | "hpp" | "rb" | "php"
                | "swift" | "scala" | "dart" | "lua",
            ) => FileCategory::Code,
            Some("csv" | "parquet") => FileCategory::Data,
            _ => FileCategory::Other,
        }
    }
}

fn store_file(tx: &rusqlite::Transaction, file: &File) -> anyhow::Result<()> {
    librarian_store::store::upsert_file_tx(tx, file)
}
fn store_module(tx: &rusqlite::Transaction, module: &Module) -> anyhow::Result<()> {
    librarian_store::store::upsert_module_tx(tx, module)
}
fn store_function(tx: &rusqlite::Transaction, function: &Function) -> anyhow::Result<()> {
    librarian_store::store::upsert_function_tx(tx, function)
}
fn store_edge(tx: &rusqlite::Transaction, edge: &GraphEdge) -> anyhow::Result<()> {
    librarian_store::store::upsert_edge_tx(tx, edge)
}
fn store_directory(tx: &rusqlite::Transaction, dir: &Directory) -> anyhow::Result<()> {
    librarian_store::store::upsert_directory_tx(tx, dir)
}
