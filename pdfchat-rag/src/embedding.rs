//! Embedding provider trait for generating vector embeddings from text.

use async_trait::async_trait;

use crate::error::Result;

/// A provider that maps text to fixed-dimension embedding vectors.
///
/// Implementations wrap a specific backend behind a unified async
/// interface. The default [`embed_batch`](EmbeddingProvider::embed_batch)
/// calls [`embed`](EmbeddingProvider::embed) sequentially; backends with
/// native batching should override it.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Generate an embedding vector for a single text input.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Generate embedding vectors for a batch of text inputs.
    ///
    /// The output has the same length and order as the input. The default
    /// implementation embeds each input sequentially.
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let mut results = Vec::with_capacity(texts.len());
        for text in texts {
            results.push(self.embed(text).await?);
        }
        Ok(results)
    }

    /// Return the dimensionality of embeddings produced by this provider.
    ///
    /// Callers validate returned vectors against this value; a provider
    /// returning vectors of a different length is a contract violation.
    fn dimensions(&self) -> usize;

    /// Human-readable provider name, used in error reports.
    fn name(&self) -> &str {
        "embedding provider"
    }
}
