//! Structural facts: the language-neutral output of every extractor.
//!
//! A fact is a claim about one syntactic element at one file/line. The
//! bootstrap pipeline turns facts into [`librarian_core`] entities and
//! edges; extractors themselves never touch the graph or the store.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// A parameter name paired with its declared type, when the source
/// language is typed or annotated. Untyped languages leave the type empty.
pub type Param = (String, String);

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct FunctionDetails {
    pub params: Vec<Param>,
    pub return_type: Option<String>,
    pub is_async: bool,
    pub is_exported: bool,
    pub is_abstract: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ClassDetails {
    pub methods: Vec<String>,
    pub is_abstract: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TypeDetails {
    pub definition: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ImportDetails {
    pub module: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExportDetails {
    pub exported_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CallDetails {
    pub callee: String,
}

/// The typed payload of a [`StructuralFact`], one variant per recognized
/// syntactic kind.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FactDetails {
    FunctionDef(FunctionDetails),
    Class(ClassDetails),
    Type(TypeDetails),
    Import(ImportDetails),
    Export(ExportDetails),
    Call(CallDetails),
}

/// One syntactic claim extracted from a single file: "there is a
/// function named `foo` at line 12 with these params", "this file
/// imports `bar`", and so on.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StructuralFact {
    pub identifier: String,
    pub file: PathBuf,
    pub line: u32,
    pub details: FactDetails,
}

impl StructuralFact {
    pub fn function(
        identifier: impl Into<String>,
        file: PathBuf,
        line: u32,
        details: FunctionDetails,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            file,
            line,
            details: FactDetails::FunctionDef(details),
        }
    }

    pub fn class(identifier: impl Into<String>, file: PathBuf, line: u32, details: ClassDetails) -> Self {
        Self {
            identifier: identifier.into(),
            file,
            line,
            details: FactDetails::Class(details),
        }
    }

    pub fn import(identifier: impl Into<String>, file: PathBuf, line: u32, module: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            file,
            line,
            details: FactDetails::Import(ImportDetails { module: module.into() }),
        }
    }

    pub fn export(identifier: impl Into<String>, file: PathBuf, line: u32, exported_name: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            file,
            line,
            details: FactDetails::Export(ExportDetails {
                exported_name: exported_name.into(),
            }),
        }
    }

    pub fn call(identifier: impl Into<String>, file: PathBuf, line: u32, callee: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            file,
            line,
            details: FactDetails::Call(CallDetails { callee: callee.into() }),
        }
    }

    pub fn type_def(identifier: impl Into<String>, file: PathBuf, line: u32, definition: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            file,
            line,
            details: FactDetails::Type(TypeDetails {
                definition: definition.into(),
            }),
        }
    }
}
