//! Provider Capability Shims: narrow LLM/embedding traits behind a
//! capability probe and readiness gate, so the query pipeline never has
//! to know which backend (or none) answered.

pub mod backends;
pub mod capability;
pub mod embedding;
pub mod llm;
pub mod registry;

pub use capability::{fold_readiness, CapabilityProbe, Readiness};
pub use embedding::EmbeddingProvider;
pub use llm::{LlmProvider, SynthesisRequest, SynthesisResult};
pub use registry::{create_llm_provider, probe_readiness};
