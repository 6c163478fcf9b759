//! OpenAI-backed [`LlmProvider`] and [`EmbeddingProvider`].

use std::time::Instant;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::capability::CapabilityProbe;
use crate::embedding::EmbeddingProvider;
use crate::llm::{LlmProvider, SynthesisRequest, SynthesisResult};

pub struct OpenAiProvider {
    client: reqwest::Client,
    api_key: String,
    model: String,
    embedding_model: String,
}

impl OpenAiProvider {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.unwrap_or_else(|| std::env::var("OPENAI_API_KEY").unwrap_or_default()),
            model: "gpt-4o-mini".to_string(),
            embedding_model: "text-embedding-3-small".to_string(),
        }
    }
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
    usage: Option<ChatUsage>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatUsage {
    total_tokens: u32,
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingDatum>,
}

#[derive(Deserialize)]
struct EmbeddingDatum {
    embedding: Vec<f32>,
}

#[async_trait::async_trait]
impl LlmProvider for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    async fn probe(&self) -> CapabilityProbe {
        if self.api_key.is_empty() {
            return CapabilityProbe::unavailable("openai", "OPENAI_API_KEY not set");
        }
        let started = Instant::now();
        let result = self
            .client
            .get("https://api.openai.com/v1/models")
            .header("Authorization", format!("Bearer {}", self.api_key))
            .send()
            .await;
        match result {
            Ok(resp) if resp.status().is_success() => {
                CapabilityProbe::ready("openai", started.elapsed().as_millis() as u64, self.model.clone())
            }
            Ok(resp) => CapabilityProbe::unavailable("openai", format!("HTTP {}", resp.status())),
            Err(e) => CapabilityProbe::unavailable("openai", e.to_string()),
        }
    }

    async fn synthesize(&self, request: &SynthesisRequest) -> anyhow::Result<SynthesisResult> {
        let prompt = format!(
            "Intent: {}\n\nKnown facts:\n{}\n\nRelated files:\n{}\n\nWrite a concise, accurate answer grounded only in the facts above.",
            request.intent,
            request.key_facts.join("\n"),
            request.related_files.join("\n")
        );
        let body = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage { role: "system".to_string(), content: "You are a codebase assistant. Never invent facts not present in the context.".to_string() },
                ChatMessage { role: "user".to_string(), content: prompt },
            ],
            temperature: 0.2,
            max_tokens: 500,
        };

        let response = self
            .client
            .post("https://api.openai.com/v1/chat/completions")
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await
            .context("failed to reach OpenAI")?;

        if !response.status().is_success() {
            anyhow::bail!("OpenAI API error: {}", response.text().await.unwrap_or_default());
        }

        let parsed: ChatResponse = response.json().await?;
        let summary = parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content.trim().to_string())
            .unwrap_or_default();
        Ok(SynthesisResult { summary, tokens_used: parsed.usage.map(|u| u.total_tokens).unwrap_or(0) })
    }
}

#[async_trait::async_trait]
impl EmbeddingProvider for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    async fn probe(&self) -> CapabilityProbe {
        LlmProvider::probe(self).await
    }

    async fn embed(&self, text: &str) -> anyhow::Result<Vec<f32>> {
        let response = self
            .client
            .post("https://api.openai.com/v1/embeddings")
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&EmbeddingRequest { model: &self.embedding_model, input: text })
            .send()
            .await
            .context("failed to reach OpenAI embeddings endpoint")?;

        let parsed: EmbeddingResponse = response.json().await?;
        parsed.data.into_iter().next().map(|d| d.embedding).context("empty embedding response")
    }
}
