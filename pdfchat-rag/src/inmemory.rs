//! In-memory vector index using cosine similarity.
//!
//! [`InMemoryVectorIndex`] keeps chunks in insertion order under a
//! `tokio::sync::RwLock`, which makes tie-breaking deterministic and a
//! single upsert atomic with respect to readers.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::document::{Chunk, SearchResult};
use crate::error::{RagError, Result};
use crate::vectorstore::VectorIndex;

const BACKEND: &str = "InMemory";

#[derive(Debug, Default)]
struct IndexInner {
    /// Chunks in insertion order. Upserting an existing id replaces the
    /// chunk in place so its original position is kept.
    chunks: Vec<Chunk>,
    /// Chunk id to slot in `chunks`.
    slots: HashMap<String, usize>,
    /// Embedding dimension, fixed by the first stored chunk.
    dimensions: Option<usize>,
}

/// An in-memory [`VectorIndex`] using cosine similarity for search.
///
/// A batch upsert is validated in full before any chunk lands, so a failed
/// write leaves the index exactly as it was.
#[derive(Debug, Default)]
pub struct InMemoryVectorIndex {
    inner: RwLock<IndexInner>,
}

impl InMemoryVectorIndex {
    /// Create a new empty index.
    pub fn new() -> Self {
        Self::default()
    }
}

/// Compute cosine similarity between two vectors of equal dimension.
///
/// Returns 0.0 if either vector has zero magnitude.
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

#[async_trait]
impl VectorIndex for InMemoryVectorIndex {
    async fn upsert(&self, chunks: &[Chunk]) -> Result<()> {
        let mut inner = self.inner.write().await;

        // Validate the whole batch before touching the index.
        let mut dimensions = inner.dimensions;
        for chunk in chunks {
            if chunk.embedding.is_empty() {
                return Err(RagError::IndexWrite {
                    backend: BACKEND.to_string(),
                    message: format!("chunk '{}' has no embedding", chunk.id),
                });
            }
            match dimensions {
                Some(d) if d != chunk.embedding.len() => {
                    return Err(RagError::IndexWrite {
                        backend: BACKEND.to_string(),
                        message: format!(
                            "chunk '{}' has dimension {} but the index holds {d}",
                            chunk.id,
                            chunk.embedding.len()
                        ),
                    });
                }
                Some(_) => {}
                None => dimensions = Some(chunk.embedding.len()),
            }
        }

        let inner = &mut *inner;
        inner.dimensions = dimensions;
        for chunk in chunks {
            match inner.slots.get(&chunk.id).copied() {
                Some(slot) => inner.chunks[slot] = chunk.clone(),
                None => {
                    inner.slots.insert(chunk.id.clone(), inner.chunks.len());
                    inner.chunks.push(chunk.clone());
                }
            }
        }
        Ok(())
    }

    async fn query(&self, embedding: &[f32], k: usize) -> Result<Vec<SearchResult>> {
        let inner = self.inner.read().await;
        if inner.chunks.is_empty() {
            return Ok(Vec::new());
        }
        if let Some(d) = inner.dimensions {
            if embedding.len() != d {
                return Err(RagError::IndexQuery {
                    backend: BACKEND.to_string(),
                    message: format!(
                        "query has dimension {} but the index holds {d}",
                        embedding.len()
                    ),
                });
            }
        }

        // Scoring in insertion order plus a stable sort keeps ties resolved
        // to the earliest-inserted chunk.
        let mut scored: Vec<SearchResult> = inner
            .chunks
            .iter()
            .map(|chunk| SearchResult {
                chunk: chunk.clone(),
                score: cosine_similarity(&chunk.embedding, embedding),
            })
            .collect();
        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(k);
        Ok(scored)
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.inner.read().await.chunks.len())
    }

    async fn clear(&self) -> Result<()> {
        let mut inner = self.inner.write().await;
        inner.chunks.clear();
        inner.slots.clear();
        inner.dimensions = None;
        Ok(())
    }
}
