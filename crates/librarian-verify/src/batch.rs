//! Batch verification: runs every citation in a piece of text through
//! [`crate::verify::verify_citation`], attaches corrections where
//! verification failed, and rolls the results up into a validation rate
//! the caller can gate on (spec §4.5's quality-gate integration point).

use librarian_store::Store;
use serde::{Deserialize, Serialize};

use crate::citation::{extract_citations, Citation};
use crate::correction::{suggest_correction, Correction};
use crate::verify::{verify_citation, VerificationResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CitationCheck {
    pub citation: Citation,
    pub result: VerificationResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correction: Option<Correction>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    pub checks: Vec<CitationCheck>,
    pub validation_rate: f64,
    pub warnings: Vec<String>,
}

// strsim::Correction doesn't derive Serialize; implement it narrowly here
// so the batch report round-trips through JSON for session persistence.
impl Serialize for Correction {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;
        let mut s = serializer.serialize_struct("Correction", 4)?;
        s.serialize_field("suggested_file", &self.suggested_file)?;
        s.serialize_field("suggested_line", &self.suggested_line)?;
        s.serialize_field("suggested_identifier", &self.suggested_identifier)?;
        s.serialize_field("similarity", &self.similarity)?;
        s.end()
    }
}

impl<'de> Deserialize<'de> for Correction {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Raw {
            suggested_file: Option<String>,
            suggested_line: Option<u32>,
            suggested_identifier: Option<String>,
            similarity: f64,
        }
        let raw = Raw::deserialize(deserializer)?;
        Ok(Correction {
            suggested_file: raw.suggested_file,
            suggested_line: raw.suggested_line,
            suggested_identifier: raw.suggested_identifier,
            similarity: raw.similarity,
        })
    }
}

pub fn verify_text(text: &str, store: &Store, min_validation_rate: f64, strict: bool) -> anyhow::Result<BatchReport> {
    let citations = extract_citations(text);
    let mut checks = Vec::with_capacity(citations.len());
    let mut verified = 0usize;
    let mut warnings = Vec::new();

    for citation in citations {
        let result = verify_citation(&citation, store)?;
        if result.exists {
            verified += 1;
        }
        let correction = if result.exists { None } else { suggest_correction(&citation, store)? };
        if !result.exists && correction.is_none() {
            warnings.push(format!("unverified_by_trace(no_match): {}", citation.claim_text));
        }
        checks.push(CitationCheck { citation, result, correction });
    }

    let validation_rate = if checks.is_empty() { 1.0 } else { verified as f64 / checks.len() as f64 };

    if validation_rate < min_validation_rate {
        warnings.push(format!(
            "validation rate {validation_rate:.2} below minimum {min_validation_rate:.2}"
        ));
    }
    if strict && validation_rate < 1.0 {
        warnings.push("strict mode: one or more citations failed verification".to_string());
    }

    Ok(BatchReport { checks, validation_rate, warnings })
}
