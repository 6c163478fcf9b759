//! Stage 3: pull retrieval candidates out of the store. Enumeration and
//! structural intents short-circuit to a deterministic sorted listing
//! before any scoring happens; general intents fall through to ranking.

use std::path::PathBuf;

use librarian_store::Store;

use crate::rank::Candidate;

pub fn candidates_from_store(store: &Store) -> anyhow::Result<Vec<Candidate>> {
    let mut candidates = Vec::new();

    for module in store.all_modules()? {
        candidates.push(Candidate {
            pack_id: format!("module:{}", module.path.display()),
            name: module.path.file_stem().map(|s| s.to_string_lossy().to_string()).unwrap_or_default(),
            purpose: module.purpose,
            path: module.path,
            semantic_score: None,
        });
    }

    for function in store.all_functions()? {
        candidates.push(Candidate {
            pack_id: format!("function:{}:{}", function.file_path.display(), function.name),
            name: function.name,
            purpose: function.purpose,
            path: function.file_path,
            semantic_score: None,
        });
    }

    Ok(candidates)
}

/// Deterministic listing for Enumeration-mode intents: every file path,
/// sorted, bypassing semantic scoring entirely.
pub fn enumerate_files(store: &Store) -> anyhow::Result<Vec<PathBuf>> {
    let mut paths: Vec<PathBuf> = store.all_files()?.into_iter().map(|f| f.path).collect();
    paths.sort();
    Ok(paths)
}

/// Deterministic listing for Structural-mode "who calls X" intents:
/// callers of the named function, sorted by source file.
pub fn structural_callers(store: &Store, target_name: &str) -> anyhow::Result<Vec<PathBuf>> {
    let mut callers = Vec::new();
    for function in store.all_functions()? {
        if function.name == target_name {
            for edge in store.edges_to(function.id)? {
                callers.push(edge.source_file);
            }
        }
    }
    callers.sort();
    callers.dedup();
    Ok(callers)
}
