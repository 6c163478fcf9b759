//! The synthesis half of the capability surface: turns ranked context
//! packs into a natural-language answer.

use serde::{Deserialize, Serialize};

use crate::capability::CapabilityProbe;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynthesisRequest {
    pub intent: String,
    pub key_facts: Vec<String>,
    pub related_files: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynthesisResult {
    pub summary: String,
    pub tokens_used: u32,
}

#[async_trait::async_trait]
pub trait LlmProvider: Send + Sync {
    fn name(&self) -> &str;

    async fn probe(&self) -> CapabilityProbe;

    async fn synthesize(&self, request: &SynthesisRequest) -> anyhow::Result<SynthesisResult>;
}
