//! Suggests a correction for a citation that failed verification, by
//! nearest-neighbor match against what actually exists in the store —
//! never invents a path or identifier that isn't present.

use std::path::Path;

use librarian_store::Store;
use strsim::normalized_levenshtein;

use crate::citation::Citation;

const SIMILARITY_THRESHOLD: f64 = 0.5;

#[derive(Debug, Clone)]
pub struct Correction {
    pub suggested_file: Option<String>,
    pub suggested_line: Option<u32>,
    pub suggested_identifier: Option<String>,
    pub similarity: f64,
}

/// Best-effort nearest match for a citation that didn't verify. Returns
/// `None` when nothing in the store clears the similarity threshold —
/// a wrong suggestion is worse than no suggestion.
pub fn suggest_correction(citation: &Citation, store: &Store) -> anyhow::Result<Option<Correction>> {
    if let Some(ident) = &citation.identifier {
        if let Some(file) = &citation.file {
            if let Some((name, sim)) = nearest_identifier_in_file(ident, file, store)? {
                if sim > SIMILARITY_THRESHOLD {
                    let line = nearest_line_for_identifier(file, &name, citation.line, store)?;
                    return Ok(Some(Correction {
                        suggested_file: Some(file.clone()),
                        suggested_line: line,
                        suggested_identifier: Some(name),
                        similarity: sim,
                    }));
                }
            }
        }
        if let Some((path, line)) = store.find_function_by_name(ident)? {
            return Ok(Some(Correction {
                suggested_file: Some(path),
                suggested_line: Some(line),
                suggested_identifier: Some(ident.clone()),
                similarity: 1.0,
            }));
        }
    }

    if let Some(file) = &citation.file {
        if let Some((candidate, sim)) = nearest_file(file, store)? {
            if sim > SIMILARITY_THRESHOLD && candidate != *file {
                let line = match citation.line {
                    Some(l) => Some(clamp_to_file(&candidate, l, store)?),
                    None => None,
                };
                return Ok(Some(Correction {
                    suggested_file: Some(candidate),
                    suggested_line: line,
                    suggested_identifier: None,
                    similarity: sim,
                }));
            }
        }

        if let Some(line) = citation.line {
            let clamped = clamp_to_file(file, line, store)?;
            if clamped != line {
                return Ok(Some(Correction {
                    suggested_file: Some(file.clone()),
                    suggested_line: Some(clamped),
                    suggested_identifier: None,
                    similarity: 1.0,
                }));
            }
        }
    }

    Ok(None)
}

fn nearest_file(file: &str, store: &Store) -> anyhow::Result<Option<(String, f64)>> {
    let files = store.all_files()?;
    let mut best: Option<(String, f64)> = None;
    for f in &files {
        let candidate = f.path.to_string_lossy().to_string();
        let sim = normalized_levenshtein(file, &candidate);
        if best.as_ref().map(|(_, s)| sim > *s).unwrap_or(true) {
            best = Some((candidate, sim));
        }
    }
    Ok(best)
}

fn nearest_identifier_in_file(ident: &str, file: &str, store: &Store) -> anyhow::Result<Option<(String, f64)>> {
    let functions = store.functions_in_file(Path::new(file))?;
    let mut best: Option<(String, f64)> = None;
    for func in &functions {
        let sim = normalized_levenshtein(ident, &func.name);
        if best.as_ref().map(|(_, s)| sim > *s).unwrap_or(true) {
            best = Some((func.name.clone(), sim));
        }
    }
    Ok(best)
}

fn nearest_line_for_identifier(
    path: &str,
    ident: &str,
    hint_line: Option<u32>,
    store: &Store,
) -> anyhow::Result<Option<u32>> {
    let functions = store.functions_in_file(Path::new(path))?;
    let target_line = hint_line.unwrap_or(0);
    if let Some(exact) = functions.iter().find(|f| f.name == ident) {
        return Ok(Some(exact.start_line));
    }
    Ok(functions
        .iter()
        .min_by_key(|f| (f.start_line as i64 - target_line as i64).unsigned_abs())
        .map(|f| f.start_line))
}

fn clamp_to_file(path: &str, line: u32, store: &Store) -> anyhow::Result<u32> {
    let functions = store.functions_in_file(Path::new(path))?;
    let max_line = functions.iter().map(|f| f.end_line).max().unwrap_or(line);
    Ok(line.min(max_line.max(1)))
}
