//! Local heuristic backend: always available, never calls out, used as
//! the floor the readiness gate falls back to when no remote provider is
//! authenticated and `llmRequirement` permits `optional`.

use crate::capability::CapabilityProbe;
use crate::embedding::EmbeddingProvider;
use crate::llm::{LlmProvider, SynthesisRequest, SynthesisResult};

pub struct LocalProvider;

impl LocalProvider {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LocalProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl LlmProvider for LocalProvider {
    fn name(&self) -> &str {
        "local"
    }

    async fn probe(&self) -> CapabilityProbe {
        CapabilityProbe::ready("local", 0, "heuristic")
    }

    async fn synthesize(&self, request: &SynthesisRequest) -> anyhow::Result<SynthesisResult> {
        let summary = if request.key_facts.is_empty() {
            format!("No structural facts were found for: {}", request.intent)
        } else {
            format!(
                "{} relevant fact(s) found for \"{}\": {}",
                request.key_facts.len(),
                request.intent,
                request.key_facts.join("; ")
            )
        };
        Ok(SynthesisResult { summary, tokens_used: 0 })
    }
}

#[async_trait::async_trait]
impl EmbeddingProvider for LocalProvider {
    fn name(&self) -> &str {
        "local"
    }

    async fn probe(&self) -> CapabilityProbe {
        LlmProvider::probe(self).await
    }

    /// Deterministic bag-of-characters embedding — not semantically
    /// meaningful, but stable and dependency-free so heuristic mode never
    /// needs a remote call to report *some* vector.
    async fn embed(&self, text: &str) -> anyhow::Result<Vec<f32>> {
        let mut buckets = vec![0f32; 32];
        for (i, byte) in text.bytes().enumerate() {
            buckets[(byte as usize + i) % 32] += 1.0;
        }
        let norm = buckets.iter().map(|v| v * v).sum::<f32>().sqrt().max(1.0);
        Ok(buckets.into_iter().map(|v| v / norm).collect())
    }
}
