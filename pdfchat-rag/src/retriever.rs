//! Similarity-based context retrieval.

use std::sync::Arc;

use tracing::debug;

use crate::document::SearchResult;
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::vectorstore::VectorIndex;

/// Retrieves the stored chunks most similar to a question.
///
/// Read-only: retrieval never mutates index state. Repeated calls against
/// an unchanged index return the same ordered results.
pub struct Retriever {
    embedding_provider: Arc<dyn EmbeddingProvider>,
    index: Arc<dyn VectorIndex>,
}

impl Retriever {
    /// Create a retriever over the given provider and index.
    pub fn new(embedding_provider: Arc<dyn EmbeddingProvider>, index: Arc<dyn VectorIndex>) -> Self {
        Self { embedding_provider, index }
    }

    /// Embed `question` and return its `k` nearest chunks, ordered by
    /// descending similarity.
    ///
    /// An empty index yields an empty result; an empty-context answer is a
    /// valid, if low-quality, outcome.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Config`] if `k` is zero, and propagates
    /// [`RagError::Embedding`] and [`RagError::IndexQuery`].
    pub async fn retrieve(&self, question: &str, k: usize) -> Result<Vec<SearchResult>> {
        if k == 0 {
            return Err(RagError::Config("k must be greater than zero".to_string()));
        }

        let embedding = self.embedding_provider.embed(question).await?;
        let dimensions = self.embedding_provider.dimensions();
        if embedding.len() != dimensions {
            return Err(RagError::Embedding {
                provider: self.embedding_provider.name().to_string(),
                message: format!(
                    "provider declared {dimensions} dimensions but returned a vector of {}",
                    embedding.len()
                ),
            });
        }
        let results = self.index.query(&embedding, k).await?;
        debug!(k, result_count = results.len(), "retrieved context");
        Ok(results)
    }
}
