//! Embedding and chat providers backed by a local Ollama instance.
//!
//! Both providers call the Ollama REST API directly with `reqwest`
//! (`/api/embed` and `/api/chat`). Model availability is the operator's
//! concern; an unreachable or missing model surfaces as the provider error.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::chat::{ChatProvider, Message};
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};

/// The default Ollama API base URL.
const DEFAULT_BASE_URL: &str = "http://localhost:11434";

/// The default embedding model.
const DEFAULT_EMBEDDING_MODEL: &str = "nomic-embed-text";

/// The dimensionality of `nomic-embed-text` embeddings.
const DEFAULT_EMBEDDING_DIMENSIONS: usize = 768;

/// The default chat model.
const DEFAULT_CHAT_MODEL: &str = "llama3.2:1b";

const PROVIDER: &str = "Ollama";

fn embedding_error(message: impl Into<String>) -> RagError {
    RagError::Embedding { provider: PROVIDER.to_string(), message: message.into() }
}

fn chat_error(message: impl Into<String>) -> RagError {
    RagError::Chat { provider: PROVIDER.to_string(), message: message.into() }
}

// ── Ollama API request/response types ──────────────────────────────

#[derive(Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: &'a [&'a str],
}

#[derive(Deserialize)]
struct EmbedResponse {
    embeddings: Vec<Vec<f32>>,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    stream: bool,
}

#[derive(Deserialize)]
struct ChatResponse {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: String,
}

// ── Embedding provider ─────────────────────────────────────────────

/// An [`EmbeddingProvider`] backed by Ollama's `/api/embed` endpoint.
///
/// Defaults to `nomic-embed-text` (768 dimensions) on `localhost:11434`.
///
/// # Example
///
/// ```rust,ignore
/// use pdfchat_rag::OllamaEmbeddingProvider;
///
/// let provider = OllamaEmbeddingProvider::new().with_model("nomic-embed-text", 768);
/// let embedding = provider.embed("hello world").await?;
/// ```
pub struct OllamaEmbeddingProvider {
    client: reqwest::Client,
    base_url: String,
    model: String,
    dimensions: usize,
}

impl Default for OllamaEmbeddingProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl OllamaEmbeddingProvider {
    /// Create a provider with the default model and base URL.
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_EMBEDDING_MODEL.to_string(),
            dimensions: DEFAULT_EMBEDDING_DIMENSIONS,
        }
    }

    /// Set the embedding model and its output dimensionality.
    pub fn with_model(mut self, model: impl Into<String>, dimensions: usize) -> Self {
        self.model = model.into();
        self.dimensions = dimensions;
        self
    }

    /// Set the Ollama API base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl EmbeddingProvider for OllamaEmbeddingProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut embeddings = self.embed_batch(&[text]).await?;
        embeddings
            .pop()
            .ok_or_else(|| embedding_error("API returned no embedding"))
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        debug!(model = %self.model, batch_size = texts.len(), "embedding batch");

        let request = EmbedRequest { model: &self.model, input: texts };
        let response = self
            .client
            .post(format!("{}/api/embed", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(|e| embedding_error(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(embedding_error(format!("API returned {status}: {body}")));
        }

        let body: EmbedResponse =
            response.json().await.map_err(|e| embedding_error(e.to_string()))?;
        if body.embeddings.len() != texts.len() {
            return Err(embedding_error(format!(
                "API returned {} embeddings for {} inputs",
                body.embeddings.len(),
                texts.len()
            )));
        }
        Ok(body.embeddings)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &str {
        PROVIDER
    }
}

// ── Chat provider ──────────────────────────────────────────────────

/// A [`ChatProvider`] backed by Ollama's `/api/chat` endpoint.
///
/// Requests a non-streamed completion and returns the message content
/// verbatim. Defaults to `llama3.2:1b` on `localhost:11434`.
pub struct OllamaChatProvider {
    client: reqwest::Client,
    base_url: String,
    model: String,
}

impl Default for OllamaChatProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl OllamaChatProvider {
    /// Create a provider with the default model and base URL.
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_CHAT_MODEL.to_string(),
        }
    }

    /// Set the chat model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the Ollama API base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl ChatProvider for OllamaChatProvider {
    async fn complete(&self, messages: &[Message]) -> Result<String> {
        debug!(model = %self.model, message_count = messages.len(), "requesting completion");

        let request = ChatRequest { model: &self.model, messages, stream: false };
        let response = self
            .client
            .post(format!("{}/api/chat", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(|e| chat_error(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(chat_error(format!("API returned {status}: {body}")));
        }

        let body: ChatResponse = response.json().await.map_err(|e| chat_error(e.to_string()))?;
        Ok(body.message.content)
    }
}
