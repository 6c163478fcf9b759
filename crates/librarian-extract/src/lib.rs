//! Fact Extractor: turns source files into [`StructuralFact`]s — parsed
//! via tree-sitter where a grammar is wired up, via regex heuristics
//! otherwise. Never touches the graph or the store; that's bootstrap's
//! job.

pub mod extractor;
pub mod fact;
pub mod heuristic;
pub mod languages;
pub mod parser_pool;

pub use extractor::{point_to_line, ExtractOutcome, FactExtractorRegistry, LanguageExtractor, MAX_FILE_SIZE};
pub use fact::{
    CallDetails, ClassDetails, ExportDetails, FactDetails, FunctionDetails, ImportDetails, StructuralFact,
    TypeDetails,
};
pub use heuristic::HeuristicExtractor;
pub use parser_pool::{create_parser_pool, FileType, ParseRequest, ParseResult, ParserPool};
