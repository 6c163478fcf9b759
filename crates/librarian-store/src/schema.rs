//! SQLite schema for the knowledge store.
//!
//! One `meta` row carries the [`librarian_core::VersionFingerprint`] the
//! store was built with; [`crate::store::Store::open`] refuses to serve
//! reads/writes against a schema-incompatible fingerprint rather than
//! silently reinterpreting rows under a newer layout.

pub const DDL: &str = r#"
CREATE TABLE IF NOT EXISTS meta (
    key   TEXT PRIMARY KEY,
    value TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS files (
    path        TEXT PRIMARY KEY,
    checksum    INTEGER NOT NULL,
    category    TEXT NOT NULL,
    role        TEXT NOT NULL,
    imports     TEXT NOT NULL DEFAULT '[]',
    imported_by TEXT NOT NULL DEFAULT '[]'
);

CREATE TABLE IF NOT EXISTS functions (
    id         INTEGER PRIMARY KEY,
    name       TEXT NOT NULL,
    file_path  TEXT NOT NULL,
    start_line INTEGER NOT NULL,
    end_line   INTEGER NOT NULL,
    signature  TEXT NOT NULL,
    purpose    TEXT NOT NULL DEFAULT '',
    confidence REAL NOT NULL DEFAULT 0.0,
    embedding  BLOB
);
CREATE INDEX IF NOT EXISTS idx_functions_file ON functions(file_path);

CREATE TABLE IF NOT EXISTS modules (
    path         TEXT PRIMARY KEY,
    exports      TEXT NOT NULL DEFAULT '[]',
    dependencies TEXT NOT NULL DEFAULT '[]',
    purpose      TEXT NOT NULL DEFAULT '',
    embedding    BLOB
);

CREATE TABLE IF NOT EXISTS directories (
    path    TEXT PRIMARY KEY,
    role    TEXT NOT NULL,
    purpose TEXT NOT NULL DEFAULT ''
);

CREATE TABLE IF NOT EXISTS edges (
    id           INTEGER PRIMARY KEY,
    from_id      INTEGER NOT NULL,
    from_kind    TEXT NOT NULL,
    to_id        INTEGER NOT NULL,
    to_kind      TEXT NOT NULL,
    kind         TEXT NOT NULL,
    source_file  TEXT NOT NULL,
    confidence   REAL NOT NULL DEFAULT 1.0
);
CREATE INDEX IF NOT EXISTS idx_edges_from ON edges(from_id);
CREATE INDEX IF NOT EXISTS idx_edges_to ON edges(to_id);

CREATE TABLE IF NOT EXISTS context_packs (
    pack_id    TEXT PRIMARY KEY,
    target_id  INTEGER NOT NULL,
    payload    TEXT NOT NULL,
    created_at TEXT NOT NULL
);
"#;

pub const VERSION_KEY: &str = "version_fingerprint";
