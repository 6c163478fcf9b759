//! Citation extraction: a finite, restartable lazy sequence over the
//! input text, per §9's "generators" re-architecture note — implemented
//! here as a plain `Vec` built in one pass so both the corrector and the
//! reporter can iterate it independently without re-parsing.

use regex::Regex;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Citation {
    pub file: Option<String>,
    pub line: Option<u32>,
    pub identifier: Option<String>,
    pub claim_text: String,
}

/// Extracts every citation-shaped span from `text`: `` `path:line` ``,
/// `` `path` `` near a line number, an identifier near a function/method
/// keyword, and bare backticked identifiers with a code-like context.
pub fn extract_citations(text: &str) -> Vec<Citation> {
    let mut citations = Vec::new();

    let path_line = Regex::new(r"`([\w./-]+\.\w+):(\d+)`").unwrap();
    for cap in path_line.captures_iter(text) {
        citations.push(Citation {
            file: Some(cap[1].to_string()),
            line: cap[2].parse().ok(),
            identifier: None,
            claim_text: cap[0].to_string(),
        });
    }

    let path_near_line = Regex::new(r"`([\w./-]+\.\w+)`\D{0,20}?(?:line\s+)?(\d+)").unwrap();
    for cap in path_near_line.captures_iter(text) {
        let full = cap[0].to_string();
        if path_line.is_match(&full) {
            continue;
        }
        citations.push(Citation {
            file: Some(cap[1].to_string()),
            line: cap[2].parse().ok(),
            identifier: None,
            claim_text: full,
        });
    }

    let identifier_near_keyword = Regex::new(r"(?:function|method)\s+`?([A-Za-z_]\w*)`?").unwrap();
    for cap in identifier_near_keyword.captures_iter(text) {
        citations.push(Citation {
            file: None,
            line: None,
            identifier: Some(cap[1].to_string()),
            claim_text: cap[0].to_string(),
        });
    }

    let bare_backticked = Regex::new(r"`([A-Za-z_]\w*)`").unwrap();
    for cap in bare_backticked.captures_iter(text) {
        let ident = &cap[1];
        if ident.len() < 2 || citations.iter().any(|c| c.identifier.as_deref() == Some(ident)) {
            continue;
        }
        citations.push(Citation {
            file: None,
            line: None,
            identifier: Some(ident.to_string()),
            claim_text: cap[0].to_string(),
        });
    }

    citations
}
