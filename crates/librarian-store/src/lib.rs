//! Knowledge Store: durable SQLite-backed persistence for the entity
//! graph, with a single-writer advisory lock and schema-version gate.

pub mod lock;
pub mod schema;
pub mod store;

pub use lock::WriteLock;
pub use store::Store;
