//! Librarian Core — data model, graph view, checksums, and workspace
//! conventions shared by every other crate.

pub mod checksum;
pub mod error;
pub mod graph;
pub mod model;
pub mod paths;
pub mod workspace;

pub use checksum::{checksum_bytes, checksum_file, SMALL_FILE_THRESHOLD};
pub use error::LibrarianError;
pub use graph::Graph;
pub use model::{
    is_self_referential, resolve_workspace_root, ContextPack, Checksum, Directory, DirectoryRole,
    EdgeKind, EntityId, EntityKind, File, FileCategory, Function, GraphEdge, Metadata, Module,
    QualityTier, StoreStats, VersionFingerprint,
};
pub use workspace::{detect_ecosystem, Ecosystem};
