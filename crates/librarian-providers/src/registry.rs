//! Builds the configured set of backends and folds their probes into a
//! single readiness verdict for the query pipeline.

use crate::backends::{anthropic::AnthropicProvider, local::LocalProvider, openai::OpenAiProvider};
use crate::capability::{fold_readiness, Readiness};
use crate::llm::LlmProvider;

/// Constructs the backend named `provider_name`, mirroring the teacher's
/// provider factory but returning the narrower [`LlmProvider`].
pub fn create_llm_provider(provider_name: &str, api_key: Option<String>) -> anyhow::Result<Box<dyn LlmProvider>> {
    match provider_name {
        "openai" => Ok(Box::new(OpenAiProvider::new(api_key))),
        "anthropic" => Ok(Box::new(AnthropicProvider::new(api_key))),
        "local" => Ok(Box::new(LocalProvider::new())),
        other => anyhow::bail!("unknown provider: {other}"),
    }
}

/// Probes every provider in `preference_order` and folds the results,
/// per §4.9's Readiness Gate.
pub async fn probe_readiness(providers: &[Box<dyn LlmProvider>]) -> Readiness {
    let mut probes = Vec::with_capacity(providers.len());
    for provider in providers {
        probes.push(provider.probe().await);
    }
    fold_readiness(&probes)
}
