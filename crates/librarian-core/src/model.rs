//! Durable data model: the entities the Knowledge Store persists.

use std::collections::HashMap;
use std::hash::{DefaultHasher, Hash, Hasher};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Stable identifier for any entity the graph can reference. Hashed from
/// caller-supplied parts rather than random, so re-bootstrapping identical
/// source reproduces identical ids (see the bootstrap idempotence property).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct EntityId(pub u64);

impl EntityId {
    pub fn new(parts: &[&str]) -> Self {
        let mut hasher = DefaultHasher::new();
        for part in parts {
            part.hash(&mut hasher);
        }
        EntityId(hasher.finish())
    }

    pub fn for_function(file_checksum: &Checksum, qualified_name: &str) -> Self {
        Self::new(&["function", &file_checksum.0.to_string(), qualified_name])
    }
}

/// What kind of entity an [`EntityId`] names, used as the endpoint
/// discriminant on a [`GraphEdge`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    File,
    Function,
    Module,
    Directory,
}

/// Content checksum over a file's bytes. Small files (see
/// [`crate::checksum::SMALL_FILE_THRESHOLD`]) are hashed in full on every
/// mtime/size change so same-size rewrites are still detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Checksum(pub u64);

/// Coarse classification of a file's purpose in the repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileCategory {
    Code,
    Config,
    Docs,
    Test,
    Data,
    Schema,
    Other,
}

/// A single indexed source file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct File {
    pub path: PathBuf,
    pub checksum: Checksum,
    pub category: FileCategory,
    pub role: String,
    pub imports: Vec<PathBuf>,
    pub imported_by: Vec<PathBuf>,
}

/// A single function, method, or top-level callable extracted from a file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Function {
    pub id: EntityId,
    pub name: String,
    pub file_path: PathBuf,
    pub start_line: u32,
    pub end_line: u32,
    pub signature: String,
    pub purpose: String,
    pub confidence: f32,
}

impl Function {
    /// `end_line >= start_line >= 1` and the owning file exists — callers
    /// are expected to check the latter against the store; this only
    /// checks the shape invariant.
    pub fn is_well_formed(&self) -> bool {
        self.start_line >= 1 && self.end_line >= self.start_line
    }
}

/// A logical module: usually one file, sometimes a directory with an index.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Module {
    pub path: PathBuf,
    pub exports: Vec<String>,
    pub dependencies: Vec<String>,
    pub purpose: String,
}

/// The role a directory plays in the repository layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DirectoryRole {
    Feature,
    Layer,
    Utility,
    Config,
    Tests,
    Docs,
    Root,
    Other,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Directory {
    pub path: PathBuf,
    pub role: DirectoryRole,
    pub purpose: String,
}

/// The enumerated relationship kinds a [`GraphEdge`] may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    Imports,
    Calls,
    Extends,
    Implements,
    Cochange,
}

/// A directed, typed edge between two entities, with confidence and
/// provenance (which file/line made the claim).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GraphEdge {
    pub from: (EntityId, EntityKind),
    pub to: (EntityId, EntityKind),
    pub kind: EdgeKind,
    pub source_file: PathBuf,
    pub confidence: f32,
}

/// A self-contained retrieval unit served by the query pipeline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContextPack {
    pub pack_id: String,
    pub pack_type: String,
    pub target_id: EntityId,
    pub summary: String,
    pub key_facts: Vec<String>,
    pub related_files: Vec<PathBuf>,
    pub code_snippets: Vec<String>,
    pub confidence: f32,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub version: VersionFingerprint,
}

/// Index quality tier: `Full` once embeddings exist for every module,
/// `Partial` otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityTier {
    Full,
    Partial,
}

/// Schema version plus the repository state the store was built against.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VersionFingerprint {
    pub schema_major: u32,
    pub schema_minor: u32,
    pub schema_patch: u32,
    pub quality_tier: QualityTier,
    pub indexed_at: chrono::DateTime<chrono::Utc>,
    pub head_commit: Option<String>,
}

impl VersionFingerprint {
    pub const CURRENT_MAJOR: u32 = 1;
    pub const CURRENT_MINOR: u32 = 0;

    pub fn compatible_with(&self, other: &VersionFingerprint) -> bool {
        self.schema_major == other.schema_major && self.schema_minor == other.schema_minor
    }
}

/// Aggregate counters reported by `Store::get_stats`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct StoreStats {
    pub total_files: u64,
    pub total_functions: u64,
    pub total_modules: u64,
    pub total_embeddings: u64,
    pub total_edges: u64,
}

impl StoreStats {
    pub fn embedding_ratio(&self) -> f32 {
        if self.total_modules == 0 {
            return 0.0;
        }
        self.total_embeddings as f32 / self.total_modules as f32
    }
}

/// Resolve a workspace root: the explicit path if given, otherwise walk
/// upward from the current directory until a project marker (`.git`,
/// `Cargo.toml`, `package.json`) or an existing `.librarian/` is found.
pub fn resolve_workspace_root(explicit: Option<&Path>) -> anyhow::Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path.canonicalize().unwrap_or_else(|_| path.to_path_buf()));
    }

    let mut dir = std::env::current_dir()?;
    loop {
        if dir.join(".librarian").is_dir()
            || dir.join(".git").exists()
            || dir.join("Cargo.toml").exists()
            || dir.join("package.json").exists()
        {
            return Ok(dir);
        }
        if !dir.pop() {
            break;
        }
    }
    std::env::current_dir().map_err(Into::into)
}

/// Marker files that identify a workspace as this project's own repository,
/// for `isSelfReferential` reporting during bootstrap.
pub fn is_self_referential(root: &Path) -> bool {
    root.join("crates")
        .join("librarian-core")
        .join("Cargo.toml")
        .is_file()
        && root.join(".librarian").parent().is_some()
        && root.join("Cargo.toml").is_file()
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Metadata(pub HashMap<String, String>);
