//! Fact extractor trait and per-workspace registry/dispatch.

use std::path::Path;

use crate::fact::StructuralFact;
use crate::heuristic::HeuristicExtractor;
use crate::languages;
use crate::parser_pool::{FileType, ParseRequest, ParserPool};

/// Files above this size are skipped outright rather than parsed.
pub const MAX_FILE_SIZE: u64 = 2 * 1024 * 1024;

#[derive(Debug, Default, Clone)]
pub struct ExtractOutcome {
    pub facts: Vec<StructuralFact>,
    pub warnings: Vec<String>,
}

impl ExtractOutcome {
    pub fn skipped(reason: impl Into<String>) -> Self {
        Self {
            facts: Vec::new(),
            warnings: vec![reason.into()],
        }
    }
}

/// Per-language fact extraction over an already-parsed tree. A parse
/// failure upstream never reaches here; callers get an empty outcome
/// plus a warning instead, so one malformed file can't abort a walk.
pub trait LanguageExtractor: Send + Sync {
    fn extract(&self, path: &Path, tree: &tree_sitter::Tree, source: &str) -> Vec<StructuralFact>;
}

/// Converts a tree-sitter row/column into the 1-indexed line numbers
/// facts and citations use throughout.
pub fn point_to_line(point: tree_sitter::Point) -> u32 {
    point.row as u32 + 1
}

/// Dispatches files to the right extractor by extension, owns the
/// shared parser pool, and applies the size/encoding gates before a
/// single byte reaches tree-sitter.
pub struct FactExtractorRegistry {
    parser_pool: ParserPool,
    heuristic: HeuristicExtractor,
    max_file_size: u64,
}

impl FactExtractorRegistry {
    pub fn new(parser_pool: ParserPool) -> Self {
        Self {
            parser_pool,
            heuristic: HeuristicExtractor::new(),
            max_file_size: MAX_FILE_SIZE,
        }
    }

    pub fn with_max_file_size(mut self, bytes: u64) -> Self {
        self.max_file_size = bytes;
        self
    }

    /// Extract facts from one file's raw bytes. Malformed UTF-8 is
    /// replaced lossily rather than rejected — a source file written in
    /// a legacy encoding still yields partial facts instead of none.
    pub async fn extract_file(&self, path: &Path, content: &[u8]) -> ExtractOutcome {
        if content.len() as u64 > self.max_file_size {
            return ExtractOutcome::skipped(format!(
                "{} exceeds the {}-byte extraction limit, skipped",
                path.display(),
                self.max_file_size
            ));
        }

        let source = String::from_utf8_lossy(content).into_owned();

        let Some(file_type) = FileType::from_path(path) else {
            return self.heuristic.extract(path, &source);
        };

        let request = ParseRequest {
            file_type,
            content: source.clone(),
            path: path.to_path_buf(),
        };

        let parsed = match self.parser_pool.parse(request).await {
            Ok(p) => p,
            Err(e) => {
                return ExtractOutcome {
                    facts: Vec::new(),
                    warnings: vec![format!("failed to parse {}: {e}", path.display())],
                };
            }
        };

        let facts = match file_type {
            FileType::Rust => languages::rust::RustExtractor.extract(path, &parsed.tree, &source),
            FileType::TypeScript => languages::typescript::TypeScriptExtractor.extract(path, &parsed.tree, &source),
            FileType::JavaScript => languages::javascript::JavaScriptExtractor.extract(path, &parsed.tree, &source),
            FileType::Python => languages::python::PythonExtractor.extract(path, &parsed.tree, &source),
            FileType::Go => languages::go::GoExtractor.extract(path, &parsed.tree, &source),
            FileType::Java => languages::java::JavaExtractor.extract(path, &parsed.tree, &source),
            FileType::C => languages::c::CExtractor.extract(path, &parsed.tree, &source),
            FileType::Cpp => languages::cpp::CppExtractor.extract(path, &parsed.tree, &source),
        };

        ExtractOutcome { facts, warnings: Vec::new() }
    }
}
