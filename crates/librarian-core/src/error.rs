//! Stable error identifiers shared across the workspace.
//!
//! Internal plumbing still returns `anyhow::Result` with `.context()`, the
//! way the teacher's provider code does — this enum exists for the
//! boundaries callers (mainly the CLI) need to branch on, e.g. to pick an
//! exit code.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum LibrarianError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("not bootstrapped: {0}")]
    NotBootstrapped(String),

    #[error("insufficient embedding coverage: {0}")]
    InsufficientEmbeddingCoverage(String),

    #[error("timed out: {0}")]
    Timeout(String),

    #[error("provider not ready: {0}")]
    ProviderNotReady(String),

    #[error("storage locked: {0}")]
    StorageLocked(String),

    #[error("schema incompatible: {0}")]
    SchemaIncompatible(String),

    #[error("parse error in {file}: {message}")]
    ParseError { file: String, message: String },

    #[error("index drift: {reason}")]
    IndexDrift { reason: String },

    #[error("storage write degraded: {0}")]
    StorageWriteDegraded(String),

    #[error("synthesis failed: {0}")]
    SynthesisFailed(String),
}

impl LibrarianError {
    /// Stable identifier string used in CLI `--json` error payloads and as
    /// the process exit-code selector.
    pub fn code(&self) -> &'static str {
        match self {
            LibrarianError::InvalidArgument(_) => "INVALID_ARGUMENT",
            LibrarianError::NotBootstrapped(_) => "NOT_BOOTSTRAPPED",
            LibrarianError::InsufficientEmbeddingCoverage(_) => "INSUFFICIENT_EMBEDDING_COVERAGE",
            LibrarianError::Timeout(_) => "TIMEOUT",
            LibrarianError::ProviderNotReady(_) => "PROVIDER_NOT_READY",
            LibrarianError::StorageLocked(_) => "STORAGE_LOCKED",
            LibrarianError::SchemaIncompatible(_) => "SCHEMA_INCOMPATIBLE",
            LibrarianError::ParseError { .. } => "PARSE_ERROR",
            LibrarianError::IndexDrift { .. } => "INDEX_DRIFT",
            LibrarianError::StorageWriteDegraded(_) => "STORAGE_WRITE_DEGRADED",
            LibrarianError::SynthesisFailed(_) => "SYNTHESIS_FAILED",
        }
    }

    /// Exit code used by the CLI for this error kind. 0 is never returned
    /// here — success paths don't construct an error.
    pub fn exit_code(&self) -> i32 {
        match self {
            LibrarianError::InvalidArgument(_) => 2,
            LibrarianError::NotBootstrapped(_) => 3,
            LibrarianError::InsufficientEmbeddingCoverage(_) => 4,
            LibrarianError::Timeout(_) => 5,
            LibrarianError::ProviderNotReady(_) => 6,
            LibrarianError::StorageLocked(_) => 7,
            LibrarianError::SchemaIncompatible(_) => 8,
            LibrarianError::ParseError { .. } => 9,
            LibrarianError::IndexDrift { .. } => 10,
            LibrarianError::StorageWriteDegraded(_) => 11,
            LibrarianError::SynthesisFailed(_) => 12,
        }
    }
}
