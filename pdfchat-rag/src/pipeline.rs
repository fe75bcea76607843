//! Ingestion pipeline orchestrator.
//!
//! The [`IngestionPipeline`] turns a source file into a populated vector
//! index: load → chunk → assign ids → embed → upsert.
//!
//! # Example
//!
//! ```rust,ignore
//! use pdfchat_rag::{IngestionPipeline, PdfLoader, RecursiveChunker};
//!
//! let pipeline = IngestionPipeline::builder()
//!     .loader(Arc::new(PdfLoader::new("data")))
//!     .chunker(Arc::new(RecursiveChunker::new(1000, 300)?))
//!     .embedding_provider(Arc::new(my_embedder))
//!     .index(Arc::new(InMemoryVectorIndex::new()))
//!     .build()?;
//!
//! let report = pipeline.ingest(Path::new("testpdf.pdf")).await?;
//! ```

use std::path::Path;
use std::sync::Arc;

use tracing::{error, info};
use uuid::Uuid;

use crate::chunking::Chunker;
use crate::document::IngestionReport;
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::loader::DocumentLoader;
use crate::vectorstore::VectorIndex;

/// Composes a loader, chunker, embedding provider, and vector index into a
/// single ingestion run.
///
/// The run is atomic at ingestion-run granularity: all chunks land in one
/// upsert or none do. Errors propagate undisturbed; the pipeline never
/// retries.
pub struct IngestionPipeline {
    loader: Arc<dyn DocumentLoader>,
    chunker: Arc<dyn Chunker>,
    embedding_provider: Arc<dyn EmbeddingProvider>,
    index: Arc<dyn VectorIndex>,
}

impl std::fmt::Debug for IngestionPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IngestionPipeline").finish_non_exhaustive()
    }
}

impl IngestionPipeline {
    /// Create a new [`IngestionPipelineBuilder`].
    pub fn builder() -> IngestionPipelineBuilder {
        IngestionPipelineBuilder::default()
    }

    /// Ingest a single source file into the index.
    ///
    /// Chunk ids are uuid-v4, unique across the lifetime of the index. An
    /// empty extraction yields a zero-chunk report, not an error.
    ///
    /// # Errors
    ///
    /// Propagates [`RagError::UnsupportedFormat`], [`RagError::DocumentLoad`],
    /// [`RagError::Embedding`], and [`RagError::IndexWrite`].
    pub async fn ingest(&self, source: &Path) -> Result<IngestionReport> {
        let document = self.loader.load(source).map_err(|e| {
            error!(source = %source.display(), error = %e, "document load failed");
            e
        })?;

        let mut chunks = self.chunker.chunk(&document);
        if chunks.is_empty() {
            info!(source = %source.display(), chunk_count = 0, "ingested empty document");
            return Ok(IngestionReport { chunk_count: 0 });
        }

        for chunk in &mut chunks {
            chunk.id = Uuid::new_v4().to_string();
        }

        let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
        let embeddings = self.embedding_provider.embed_batch(&texts).await.map_err(|e| {
            error!(source = %source.display(), error = %e, "embedding failed during ingestion");
            e
        })?;

        // The provider must honor its declared dimensionality.
        let dimensions = self.embedding_provider.dimensions();
        for embedding in &embeddings {
            if embedding.len() != dimensions {
                return Err(RagError::Embedding {
                    provider: self.embedding_provider.name().to_string(),
                    message: format!(
                        "provider declared {dimensions} dimensions but returned a vector of {}",
                        embedding.len()
                    ),
                });
            }
        }
        for (chunk, embedding) in chunks.iter_mut().zip(embeddings) {
            chunk.embedding = embedding;
        }

        // One logical write for the whole run.
        self.index.upsert(&chunks).await.map_err(|e| {
            error!(source = %source.display(), error = %e, "upsert failed during ingestion");
            e
        })?;

        let chunk_count = chunks.len();
        info!(source = %source.display(), chunk_count, "ingested document");
        Ok(IngestionReport { chunk_count })
    }
}

/// Builder for constructing an [`IngestionPipeline`].
///
/// All fields are required; [`build()`](IngestionPipelineBuilder::build)
/// validates and produces the pipeline.
#[derive(Default)]
pub struct IngestionPipelineBuilder {
    loader: Option<Arc<dyn DocumentLoader>>,
    chunker: Option<Arc<dyn Chunker>>,
    embedding_provider: Option<Arc<dyn EmbeddingProvider>>,
    index: Option<Arc<dyn VectorIndex>>,
}

impl IngestionPipelineBuilder {
    /// Set the document loader.
    pub fn loader(mut self, loader: Arc<dyn DocumentLoader>) -> Self {
        self.loader = Some(loader);
        self
    }

    /// Set the document chunker.
    pub fn chunker(mut self, chunker: Arc<dyn Chunker>) -> Self {
        self.chunker = Some(chunker);
        self
    }

    /// Set the embedding provider.
    pub fn embedding_provider(mut self, provider: Arc<dyn EmbeddingProvider>) -> Self {
        self.embedding_provider = Some(provider);
        self
    }

    /// Set the vector index.
    pub fn index(mut self, index: Arc<dyn VectorIndex>) -> Self {
        self.index = Some(index);
        self
    }

    /// Build the [`IngestionPipeline`], validating that all fields are set.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Config`] if any required field is missing.
    pub fn build(self) -> Result<IngestionPipeline> {
        let loader =
            self.loader.ok_or_else(|| RagError::Config("loader is required".to_string()))?;
        let chunker =
            self.chunker.ok_or_else(|| RagError::Config("chunker is required".to_string()))?;
        let embedding_provider = self
            .embedding_provider
            .ok_or_else(|| RagError::Config("embedding_provider is required".to_string()))?;
        let index = self.index.ok_or_else(|| RagError::Config("index is required".to_string()))?;

        Ok(IngestionPipeline { loader, chunker, embedding_provider, index })
    }
}
