//! Vector index trait for storing and searching chunk embeddings.

use async_trait::async_trait;

use crate::document::{Chunk, SearchResult};
use crate::error::Result;

/// A storage backend for chunk embeddings with nearest-neighbor search.
///
/// The distance metric is the backend's own; implementations report it as a
/// similarity score where higher is more relevant. Chunks are never mutated
/// once stored, and the only deletion path is [`clear`](VectorIndex::clear)
/// (whole-index rebuild).
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Store a batch of chunks, replacing any existing chunk with the same id.
    ///
    /// The write is all-or-nothing: on
    /// [`RagError::IndexWrite`](crate::error::RagError::IndexWrite) no chunk
    /// of the batch is visible to subsequent queries.
    async fn upsert(&self, chunks: &[Chunk]) -> Result<()>;

    /// Return the `k` stored chunks most similar to `embedding`, ordered by
    /// descending score. Ties resolve to the earliest-inserted chunk.
    ///
    /// An empty index yields an empty result, not an error.
    async fn query(&self, embedding: &[f32], k: usize) -> Result<Vec<SearchResult>>;

    /// Number of chunks currently stored.
    async fn count(&self) -> Result<usize>;

    /// Remove every stored chunk.
    async fn clear(&self) -> Result<()>;
}
