//! Verification: checks one [`Citation`] against the Knowledge Store in
//! the priority order §4.5 specifies — file existence first, then line
//! range, then identifier, then content.

use std::path::Path;

use librarian_store::Store;
use serde::{Deserialize, Serialize};

use crate::citation::Citation;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationMethod {
    Ast,
    Grep,
    Lsp,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationResult {
    pub exists: bool,
    pub found_at: Option<(String, u32)>,
    pub confidence: f32,
    pub alternatives: Vec<String>,
    pub method: VerificationMethod,
}

pub fn verify_citation(citation: &Citation, store: &Store) -> anyhow::Result<VerificationResult> {
    let mut confidence: f32 = 0.9;

    let Some(file_str) = &citation.file else {
        return verify_identifier_only(citation, store);
    };

    let path = Path::new(file_str);
    let Some(file) = store.get_file(path)? else {
        return Ok(VerificationResult {
            exists: false,
            found_at: None,
            confidence: (confidence - 0.2).max(0.0),
            alternatives: Vec::new(),
            method: VerificationMethod::Grep,
        });
    };
    confidence += 0.05;

    if let Some(line) = citation.line {
        let functions = store.functions_in_file(path)?;
        let max_line = functions.iter().map(|f| f.end_line).max().unwrap_or(u32::MAX);
        if line == 0 || (max_line != u32::MAX && line > max_line && !functions.is_empty()) {
            return Ok(VerificationResult {
                exists: false,
                found_at: None,
                confidence: (confidence - 0.1).max(0.0),
                alternatives: Vec::new(),
                method: VerificationMethod::Ast,
            });
        }
        confidence += 0.05;
    }

    if let Some(ident) = &citation.identifier {
        let functions = store.functions_in_file(path)?;
        if let Some(func) = functions.iter().find(|f| &f.name == ident) {
            return Ok(VerificationResult {
                exists: true,
                found_at: Some((file.path.to_string_lossy().to_string(), func.start_line)),
                confidence: confidence.min(1.0),
                alternatives: Vec::new(),
                method: VerificationMethod::Ast,
            });
        }
        return Ok(VerificationResult {
            exists: false,
            found_at: None,
            confidence: (confidence - 0.1).max(0.0),
            alternatives: Vec::new(),
            method: VerificationMethod::Ast,
        });
    }

    Ok(VerificationResult {
        exists: true,
        found_at: citation.line.map(|l| (file.path.to_string_lossy().to_string(), l)).or(Some((
            file.path.to_string_lossy().to_string(),
            1,
        ))),
        confidence: confidence.min(1.0),
        alternatives: Vec::new(),
        method: VerificationMethod::Grep,
    })
}

fn verify_identifier_only(citation: &Citation, store: &Store) -> anyhow::Result<VerificationResult> {
    let Some(ident) = &citation.identifier else {
        return Ok(VerificationResult {
            exists: false,
            found_at: None,
            confidence: 0.0,
            alternatives: Vec::new(),
            method: VerificationMethod::Grep,
        });
    };

    // Identifier with no file specified: search every function everywhere.
    let stats = store.get_stats()?;
    let _ = stats;
    match store.find_function_by_name(ident)? {
        Some((path, line)) => Ok(VerificationResult {
            exists: true,
            found_at: Some((path, line)),
            confidence: 0.9,
            alternatives: Vec::new(),
            method: VerificationMethod::Ast,
        }),
        None => Ok(VerificationResult {
            exists: false,
            found_at: None,
            confidence: 0.7,
            alternatives: Vec::new(),
            method: VerificationMethod::Ast,
        }),
    }
}
