//! Anthropic-backed [`LlmProvider`]. No first-party embeddings endpoint, so
//! this backend only implements synthesis.

use std::time::Instant;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::capability::CapabilityProbe;
use crate::llm::{LlmProvider, SynthesisRequest, SynthesisResult};

pub struct AnthropicProvider {
    client: reqwest::Client,
    api_key: String,
    model: String,
}

impl AnthropicProvider {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.unwrap_or_else(|| std::env::var("ANTHROPIC_API_KEY").unwrap_or_default()),
            model: "claude-3-haiku-20240307".to_string(),
        }
    }
}

#[derive(Serialize)]
struct MessagesRequest {
    model: String,
    max_tokens: u32,
    messages: Vec<Message>,
}

#[derive(Serialize, Deserialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
    usage: Option<Usage>,
}

#[derive(Deserialize)]
struct ContentBlock {
    text: String,
}

#[derive(Deserialize)]
struct Usage {
    input_tokens: u32,
    output_tokens: u32,
}

#[async_trait::async_trait]
impl LlmProvider for AnthropicProvider {
    fn name(&self) -> &str {
        "anthropic"
    }

    async fn probe(&self) -> CapabilityProbe {
        if self.api_key.is_empty() {
            return CapabilityProbe::unavailable("anthropic", "ANTHROPIC_API_KEY not set");
        }
        let started = Instant::now();
        let body = MessagesRequest {
            model: self.model.clone(),
            max_tokens: 1,
            messages: vec![Message { role: "user".to_string(), content: "ping".to_string() }],
        };
        let result = self
            .client
            .post("https://api.anthropic.com/v1/messages")
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .json(&body)
            .send()
            .await;
        match result {
            Ok(resp) if resp.status().is_success() => {
                CapabilityProbe::ready("anthropic", started.elapsed().as_millis() as u64, self.model.clone())
            }
            Ok(resp) => CapabilityProbe::unavailable("anthropic", format!("HTTP {}", resp.status())),
            Err(e) => CapabilityProbe::unavailable("anthropic", e.to_string()),
        }
    }

    async fn synthesize(&self, request: &SynthesisRequest) -> anyhow::Result<SynthesisResult> {
        let prompt = format!(
            "Intent: {}\n\nKnown facts:\n{}\n\nRelated files:\n{}\n\nWrite a concise, accurate answer grounded only in the facts above.",
            request.intent,
            request.key_facts.join("\n"),
            request.related_files.join("\n")
        );
        let body = MessagesRequest {
            model: self.model.clone(),
            max_tokens: 500,
            messages: vec![Message { role: "user".to_string(), content: prompt }],
        };

        let response = self
            .client
            .post("https://api.anthropic.com/v1/messages")
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .json(&body)
            .send()
            .await
            .context("failed to reach Anthropic")?;

        if !response.status().is_success() {
            anyhow::bail!("Anthropic API error: {}", response.text().await.unwrap_or_default());
        }

        let parsed: MessagesResponse = response.json().await?;
        let summary = parsed.content.into_iter().next().map(|c| c.text).unwrap_or_default();
        let tokens_used = parsed.usage.map(|u| u.input_tokens + u.output_tokens).unwrap_or(0);
        Ok(SynthesisResult { summary, tokens_used })
    }
}
