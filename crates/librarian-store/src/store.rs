//! The durable Knowledge Store: a single SQLite database under
//! `.librarian/librarian.sqlite`, opened in WAL mode so readers never
//! block behind a writer holding the [`crate::lock::WriteLock`].

use std::path::{Path, PathBuf};

use librarian_core::{
    paths, Checksum, Directory, DirectoryRole, EntityId, EntityKind, File, FileCategory, Function, GraphEdge,
    LibrarianError, Module, StoreStats, VersionFingerprint,
};
use rusqlite::{params, Connection, OptionalExtension};

use crate::schema::{DDL, VERSION_KEY};

pub struct Store {
    conn: Connection,
}

impl Store {
    /// Open (creating if absent) the store at `workspace/.librarian/librarian.sqlite`.
    /// `expected` is the caller's current schema/tooling version; an
    /// incompatible on-disk fingerprint is refused rather than
    /// reinterpreted, per [`LibrarianError::SchemaIncompatible`].
    pub fn open(workspace: &Path, expected: &VersionFingerprint) -> anyhow::Result<Self> {
        paths::ensure_state_dirs(workspace)?;
        let conn = Connection::open(paths::db_path(workspace))?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.execute_batch(DDL)?;

        let store = Self { conn };
        match store.read_fingerprint()? {
            Some(existing) if !existing.compatible_with(expected) => {
                return Err(LibrarianError::SchemaIncompatible(format!(
                    "on-disk schema {}.{} is incompatible with {}.{}",
                    existing.schema_major, existing.schema_minor, expected.schema_major, expected.schema_minor
                ))
                .into());
            }
            Some(_) => {}
            None => store.write_fingerprint(expected)?,
        }
        Ok(store)
    }

    pub fn read_fingerprint(&self) -> anyhow::Result<Option<VersionFingerprint>> {
        let raw: Option<String> = self
            .conn
            .query_row("SELECT value FROM meta WHERE key = ?1", params![VERSION_KEY], |r| r.get(0))
            .optional()?;
        Ok(raw.map(|s| serde_json::from_str(&s)).transpose()?)
    }

    pub fn write_fingerprint(&self, fp: &VersionFingerprint) -> anyhow::Result<()> {
        let raw = serde_json::to_string(fp)?;
        self.conn.execute(
            "INSERT INTO meta(key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![VERSION_KEY, raw],
        )?;
        Ok(())
    }

    /// Run `body` inside a single SQLite transaction, committing on `Ok`
    /// and rolling back on `Err` — every multi-row write (a bootstrap
    /// pass, an incremental update) goes through this so a crash
    /// mid-write never leaves a half-updated graph.
    pub fn transaction<T>(&mut self, body: impl FnOnce(&rusqlite::Transaction) -> anyhow::Result<T>) -> anyhow::Result<T> {
        let tx = self.conn.transaction()?;
        let result = body(&tx)?;
        tx.commit()?;
        Ok(result)
    }

    pub fn get_file(&self, path: &Path) -> anyhow::Result<Option<File>> {
        self.conn
            .query_row(
                "SELECT path, checksum, category, role, imports, imported_by FROM files WHERE path = ?1",
                params![path.to_string_lossy()],
                row_to_file,
            )
            .optional()
            .map_err(Into::into)
    }

    pub fn get_function(&self, id: EntityId) -> anyhow::Result<Option<Function>> {
        self.conn
            .query_row(
                "SELECT id, name, file_path, start_line, end_line, signature, purpose, confidence
                 FROM functions WHERE id = ?1",
                params![id.0 as i64],
                row_to_function,
            )
            .optional()
            .map_err(Into::into)
    }

    pub fn functions_in_file(&self, path: &Path) -> anyhow::Result<Vec<Function>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, file_path, start_line, end_line, signature, purpose, confidence
             FROM functions WHERE file_path = ?1",
        )?;
        let rows = stmt.query_map(params![path.to_string_lossy()], row_to_function)?;
        rows.collect::<Result<_, _>>().map_err(Into::into)
    }

    pub fn edges_from(&self, id: EntityId) -> anyhow::Result<Vec<GraphEdge>> {
        let mut stmt = self.conn.prepare(
            "SELECT from_id, from_kind, to_id, to_kind, kind, source_file, confidence FROM edges WHERE from_id = ?1",
        )?;
        let rows = stmt.query_map(params![id.0 as i64], row_to_edge)?;
        rows.collect::<Result<_, _>>().map_err(Into::into)
    }

    /// Looks up a function by bare name when the caller has no file to
    /// anchor the search to (an identifier-only citation). Ties broken by
    /// first match; callers needing disambiguation should prefer
    /// `functions_in_file`.
    pub fn find_function_by_name(&self, name: &str) -> anyhow::Result<Option<(String, u32)>> {
        self.conn
            .query_row(
                "SELECT file_path, start_line FROM functions WHERE name = ?1 LIMIT 1",
                params![name],
                |row| Ok((row.get::<_, String>(0)?, row.get::<_, u32>(1)?)),
            )
            .optional()
            .map_err(Into::into)
    }

    pub fn all_files(&self) -> anyhow::Result<Vec<File>> {
        let mut stmt =
            self.conn.prepare("SELECT path, checksum, category, role, imports, imported_by FROM files")?;
        let rows = stmt.query_map([], row_to_file)?;
        rows.collect::<Result<_, _>>().map_err(Into::into)
    }

    pub fn all_functions(&self) -> anyhow::Result<Vec<Function>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, file_path, start_line, end_line, signature, purpose, confidence FROM functions",
        )?;
        let rows = stmt.query_map([], row_to_function)?;
        rows.collect::<Result<_, _>>().map_err(Into::into)
    }

    pub fn all_modules(&self) -> anyhow::Result<Vec<Module>> {
        let mut stmt = self.conn.prepare("SELECT path, exports, dependencies, purpose FROM modules")?;
        let rows = stmt.query_map([], row_to_module)?;
        rows.collect::<Result<_, _>>().map_err(Into::into)
    }

    /// Fraction of modules carrying a precomputed embedding, the basis
    /// for the query pipeline's embedding-coverage gate.
    pub fn embedding_coverage(&self) -> anyhow::Result<f32> {
        Ok(self.get_stats()?.embedding_ratio())
    }

    pub fn edges_to(&self, id: EntityId) -> anyhow::Result<Vec<GraphEdge>> {
        let mut stmt = self.conn.prepare(
            "SELECT from_id, from_kind, to_id, to_kind, kind, source_file, confidence FROM edges WHERE to_id = ?1",
        )?;
        let rows = stmt.query_map(params![id.0 as i64], row_to_edge)?;
        rows.collect::<Result<_, _>>().map_err(Into::into)
    }

    pub fn get_stats(&self) -> anyhow::Result<StoreStats> {
        let total_files: u64 = self.conn.query_row("SELECT COUNT(*) FROM files", [], |r| r.get(0))?;
        let total_functions: u64 = self.conn.query_row("SELECT COUNT(*) FROM functions", [], |r| r.get(0))?;
        let total_modules: u64 = self.conn.query_row("SELECT COUNT(*) FROM modules", [], |r| r.get(0))?;
        let total_embeddings: u64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM modules WHERE embedding IS NOT NULL", [], |r| r.get(0))?;
        let total_edges: u64 = self.conn.query_row("SELECT COUNT(*) FROM edges", [], |r| r.get(0))?;
        Ok(StoreStats { total_files, total_functions, total_modules, total_embeddings, total_edges })
    }

    /// Reclaim space after a bootstrap that replaced a large fraction of
    /// rows (e.g. a rename-heavy refactor). Requires the write lock —
    /// `VACUUM` rewrites the whole file.
    pub fn vacuum(&self) -> anyhow::Result<()> {
        self.conn.execute_batch("VACUUM;")?;
        Ok(())
    }
}

/// Free functions (rather than `Store` methods) so callers can run them
/// from inside the closure passed to [`Store::transaction`] without a
/// conflicting borrow of `Store` itself.
pub fn upsert_file_tx(tx: &rusqlite::Transaction, file: &File) -> anyhow::Result<()> {
    tx.execute(
        "INSERT INTO files(path, checksum, category, role, imports, imported_by)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)
         ON CONFLICT(path) DO UPDATE SET
            checksum = excluded.checksum, category = excluded.category,
            role = excluded.role, imports = excluded.imports, imported_by = excluded.imported_by",
        params![
            file.path.to_string_lossy(),
            file.checksum.0 as i64,
            category_str(file.category),
            file.role,
            serde_json::to_string(&file.imports)?,
            serde_json::to_string(&file.imported_by)?,
        ],
    )?;
    Ok(())
}

pub fn upsert_function_tx(tx: &rusqlite::Transaction, func: &Function) -> anyhow::Result<()> {
    tx.execute(
        "INSERT INTO functions(id, name, file_path, start_line, end_line, signature, purpose, confidence)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
         ON CONFLICT(id) DO UPDATE SET
            name = excluded.name, file_path = excluded.file_path,
            start_line = excluded.start_line, end_line = excluded.end_line,
            signature = excluded.signature, purpose = excluded.purpose, confidence = excluded.confidence",
        params![
            func.id.0 as i64,
            func.name,
            func.file_path.to_string_lossy(),
            func.start_line,
            func.end_line,
            func.signature,
            func.purpose,
            func.confidence,
        ],
    )?;
    Ok(())
}

pub fn upsert_module_tx(tx: &rusqlite::Transaction, module: &Module) -> anyhow::Result<()> {
    tx.execute(
        "INSERT INTO modules(path, exports, dependencies, purpose) VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT(path) DO UPDATE SET
            exports = excluded.exports, dependencies = excluded.dependencies, purpose = excluded.purpose",
        params![
            module.path.to_string_lossy(),
            serde_json::to_string(&module.exports)?,
            serde_json::to_string(&module.dependencies)?,
            module.purpose,
        ],
    )?;
    Ok(())
}

pub fn upsert_directory_tx(tx: &rusqlite::Transaction, dir: &Directory) -> anyhow::Result<()> {
    tx.execute(
        "INSERT INTO directories(path, role, purpose) VALUES (?1, ?2, ?3)
         ON CONFLICT(path) DO UPDATE SET role = excluded.role, purpose = excluded.purpose",
        params![dir.path.to_string_lossy(), role_str(dir.role), dir.purpose],
    )?;
    Ok(())
}

pub fn upsert_edge_tx(tx: &rusqlite::Transaction, edge: &GraphEdge) -> anyhow::Result<()> {
    tx.execute(
        "INSERT INTO edges(from_id, from_kind, to_id, to_kind, kind, source_file, confidence)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            edge.from.0 .0 as i64,
            kind_str(edge.from.1),
            edge.to.0 .0 as i64,
            kind_str(edge.to.1),
            edge_kind_str(edge.kind),
            edge.source_file.to_string_lossy(),
            edge.confidence,
        ],
    )?;
    Ok(())
}

fn category_str(c: FileCategory) -> &'static str {
    match c {
        FileCategory::Code => "code",
        FileCategory::Config => "config",
        FileCategory::Docs => "docs",
        FileCategory::Test => "test",
        FileCategory::Data => "data",
        FileCategory::Schema => "schema",
        FileCategory::Other => "other",
    }
}

fn category_from_str(s: &str) -> FileCategory {
    match s {
        "config" => FileCategory::Config,
        "docs" => FileCategory::Docs,
        "test" => FileCategory::Test,
        "data" => FileCategory::Data,
        "schema" => FileCategory::Schema,
        "code" => FileCategory::Code,
        _ => FileCategory::Other,
    }
}

fn role_str(r: DirectoryRole) -> &'static str {
    match r {
        DirectoryRole::Feature => "feature",
        DirectoryRole::Layer => "layer",
        DirectoryRole::Utility => "utility",
        DirectoryRole::Config => "config",
        DirectoryRole::Tests => "tests",
        DirectoryRole::Docs => "docs",
        DirectoryRole::Root => "root",
        DirectoryRole::Other => "other",
    }
}

fn kind_str(k: EntityKind) -> &'static str {
    match k {
        EntityKind::File => "file",
        EntityKind::Function => "function",
        EntityKind::Module => "module",
        EntityKind::Directory => "directory",
    }
}

fn kind_from_str(s: &str) -> EntityKind {
    match s {
        "function" => EntityKind::Function,
        "module" => EntityKind::Module,
        "directory" => EntityKind::Directory,
        _ => EntityKind::File,
    }
}

fn edge_kind_str(k: librarian_core::EdgeKind) -> &'static str {
    use librarian_core::EdgeKind::*;
    match k {
        Imports => "imports",
        Calls => "calls",
        Extends => "extends",
        Implements => "implements",
        Cochange => "cochange",
    }
}

fn edge_kind_from_str(s: &str) -> librarian_core::EdgeKind {
    use librarian_core::EdgeKind::*;
    match s {
        "calls" => Calls,
        "extends" => Extends,
        "implements" => Implements,
        "cochange" => Cochange,
        _ => Imports,
    }
}

fn row_to_file(row: &rusqlite::Row) -> rusqlite::Result<File> {
    let imports: String = row.get(4)?;
    let imported_by: String = row.get(5)?;
    Ok(File {
        path: PathBuf::from(row.get::<_, String>(0)?),
        checksum: Checksum(row.get::<_, i64>(1)? as u64),
        category: category_from_str(&row.get::<_, String>(2)?),
        role: row.get(3)?,
        imports: serde_json::from_str(&imports).unwrap_or_default(),
        imported_by: serde_json::from_str(&imported_by).unwrap_or_default(),
    })
}

fn row_to_function(row: &rusqlite::Row) -> rusqlite::Result<Function> {
    Ok(Function {
        id: EntityId(row.get::<_, i64>(0)? as u64),
        name: row.get(1)?,
        file_path: PathBuf::from(row.get::<_, String>(2)?),
        start_line: row.get(3)?,
        end_line: row.get(4)?,
        signature: row.get(5)?,
        purpose: row.get(6)?,
        confidence: row.get(7)?,
    })
}

fn row_to_module(row: &rusqlite::Row) -> rusqlite::Result<Module> {
    let exports: String = row.get(1)?;
    let dependencies: String = row.get(2)?;
    Ok(Module {
        path: PathBuf::from(row.get::<_, String>(0)?),
        exports: serde_json::from_str(&exports).unwrap_or_default(),
        dependencies: serde_json::from_str(&dependencies).unwrap_or_default(),
        purpose: row.get(3)?,
    })
}

fn row_to_edge(row: &rusqlite::Row) -> rusqlite::Result<GraphEdge> {
    Ok(GraphEdge {
        from: (EntityId(row.get::<_, i64>(0)? as u64), kind_from_str(&row.get::<_, String>(1)?)),
        to: (EntityId(row.get::<_, i64>(2)? as u64), kind_from_str(&row.get::<_, String>(3)?)),
        kind: edge_kind_from_str(&row.get::<_, String>(4)?),
        source_file: PathBuf::from(row.get::<_, String>(5)?),
        confidence: row.get(6)?,
    })
}
