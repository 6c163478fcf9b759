//! One submodule per tree-sitter-backed language. Each implements
//! [`crate::extractor::LanguageExtractor`] by walking the parsed tree for
//! the syntactic shapes that grammar recognizes.

pub mod c;
pub mod cpp;
pub mod go;
pub mod java;
pub mod javascript;
pub mod python;
pub mod rust;
pub mod typescript;
