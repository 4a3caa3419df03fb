//! Ollama Client
//!
//! Text completion and embeddings against a local Ollama server. The service
//! code only sees the [`CompletionService`] and [`EmbeddingService`] traits so
//! tests can script model output.

use async_trait::async_trait;
use buddy_utils::{BuddyError, BuddyResult, OllamaConfig};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

/// Single prompt in, raw model text out.
#[async_trait]
pub trait CompletionService: Send + Sync {
    async fn complete(&self, prompt: &str) -> BuddyResult<String>;
}

#[async_trait]
pub trait EmbeddingService: Send + Sync {
    async fn embed(&self, text: &str) -> BuddyResult<Vec<f32>>;

    async fn embed_batch(&self, texts: &[String]) -> BuddyResult<Vec<Vec<f32>>> {
        let mut results = Vec::with_capacity(texts.len());
        for text in texts {
            results.push(self.embed(text).await?);
        }
        Ok(results)
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Debug, Serialize)]
struct GenerateOptions {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    embedding: Vec<f32>,
}

pub struct OllamaClient {
    client: Client,
    config: OllamaConfig,
    /// Model used for embeddings, settled on first use.
    embed_model: OnceCell<String>,
}

impl OllamaClient {
    pub fn new(config: OllamaConfig) -> BuddyResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            config,
            embed_model: OnceCell::new(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    async fn request_embedding(&self, model: &str, text: &str) -> BuddyResult<Vec<f32>> {
        let response = self
            .client
            .post(self.url("/api/embeddings"))
            .json(&EmbeddingRequest { model, prompt: text })
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(BuddyError::external_service(
                "Ollama",
                format!("embeddings HTTP {}: {}", status, error_text),
            ));
        }

        let body: EmbeddingResponse = response.json().await?;
        if body.embedding.is_empty() {
            return Err(BuddyError::external_service("Ollama", format!("model {} returned no embedding", model)));
        }
        Ok(body.embedding)
    }

    /// The configured embedding model when it answers a probe, else the chat model.
    async fn embedding_model(&self) -> &str {
        self.embed_model
            .get_or_init(|| async {
                match self.request_embedding(&self.config.embed_model, "healthcheck").await {
                    Ok(_) => self.config.embed_model.clone(),
                    Err(e) => {
                        warn!(
                            error = %e,
                            embed_model = %self.config.embed_model,
                            fallback = %self.config.model,
                            "Embedding model unavailable, falling back to chat model"
                        );
                        self.config.model.clone()
                    }
                }
            })
            .await
    }
}

#[async_trait]
impl CompletionService for OllamaClient {
    async fn complete(&self, prompt: &str) -> BuddyResult<String> {
        let request = GenerateRequest {
            model: &self.config.model,
            prompt,
            stream: false,
            options: GenerateOptions {
                temperature: self.config.temperature,
            },
        };

        debug!(model = %self.config.model, prompt_len = prompt.len(), "Calling Ollama generate");
        let response = self
            .client
            .post(self.url("/api/generate"))
            .json(&request)
            .send()
            .await
            .map_err(|e| BuddyError::completion(format!("Failed to call Ollama: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(BuddyError::completion(format!("Ollama HTTP {}: {}", status, error_text)));
        }

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| BuddyError::completion(format!("Failed to parse Ollama response: {}", e)))?;

        info!(model = %self.config.model, response_len = body.response.len(), "Completion received");
        Ok(body.response)
    }
}

#[async_trait]
impl EmbeddingService for OllamaClient {
    async fn embed(&self, text: &str) -> BuddyResult<Vec<f32>> {
        let model = self.embedding_model().await;
        self.request_embedding(model, text).await
    }
}
