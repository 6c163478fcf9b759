//! Query Pipeline (C4): turns an intent into ranked, sanitized context
//! packs under stated requirements.

pub mod classify;
pub mod pipeline;
pub mod rank;
pub mod retrieve;
pub mod sanitize;
pub mod session;
pub mod warnings;

pub use classify::{classify, IntentMode};
pub use pipeline::{run_query, Depth, QueryRequest, QueryResponse, Requirement, SelectionSource, SynthesisMode};
pub use session::QuerySession;
