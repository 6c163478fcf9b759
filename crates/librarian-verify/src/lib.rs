//! Citation & Symbol Verifier: grounds claims about the codebase against
//! the Knowledge Store and flags (or corrects) the ones that don't hold up.

pub mod batch;
pub mod citation;
pub mod correction;
pub mod symbol;
pub mod verify;

pub use batch::{verify_text, BatchReport, CitationCheck};
pub use citation::{extract_citations, Citation};
pub use correction::{suggest_correction, Correction};
pub use symbol::{extract_symbols, SymbolKind, SymbolReference};
pub use verify::{verify_citation, VerificationMethod, VerificationResult};
