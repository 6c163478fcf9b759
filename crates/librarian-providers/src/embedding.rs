//! The vector-coverage half of the capability surface: embeds text for
//! semantic ranking in the query pipeline's Retrieve stage.

use crate::capability::CapabilityProbe;

#[async_trait::async_trait]
pub trait EmbeddingProvider: Send + Sync {
    fn name(&self) -> &str;

    async fn probe(&self) -> CapabilityProbe;

    async fn embed(&self, text: &str) -> anyhow::Result<Vec<f32>>;
}
