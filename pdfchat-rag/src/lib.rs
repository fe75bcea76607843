//! Retrieval-augmented generation over a single PDF document.
//!
//! `pdfchat-rag` ingests a PDF into a searchable vector index and answers
//! natural-language questions by retrieving the most similar passages and
//! conditioning a chat model on them.
//!
//! The crate is built from small capabilities joined at trait seams:
//!
//! - [`Chunker`] — splits extracted text into overlapping segments
//! - [`DocumentLoader`] — extracts raw text from a source file
//! - [`EmbeddingProvider`] — maps text to fixed-dimension vectors
//! - [`VectorIndex`] — stores chunks and answers nearest-neighbor queries
//! - [`ChatProvider`] — turns an assembled prompt into a completion
//!
//! [`IngestionPipeline`] composes the write path (document → chunks →
//! embeddings → index); [`Retriever`] and [`AnswerComposer`] compose the
//! query path (question → top-K chunks → prompt → answer).
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use pdfchat_rag::{
//!     AnswerComposer, IngestionPipeline, InMemoryVectorIndex, OllamaChatProvider,
//!     OllamaEmbeddingProvider, PdfLoader, RagConfig, RecursiveChunker, Retriever,
//! };
//!
//! let config = RagConfig::default();
//! let embedder = Arc::new(OllamaEmbeddingProvider::new());
//! let index = Arc::new(InMemoryVectorIndex::new());
//!
//! let pipeline = IngestionPipeline::builder()
//!     .loader(Arc::new(PdfLoader::new("data")))
//!     .chunker(Arc::new(RecursiveChunker::new(config.chunk_size, config.chunk_overlap)?))
//!     .embedding_provider(embedder.clone())
//!     .index(index.clone())
//!     .build()?;
//! pipeline.ingest(Path::new("testpdf.pdf")).await?;
//!
//! let retriever = Retriever::new(embedder, index);
//! let composer = AnswerComposer::new(retriever, Arc::new(OllamaChatProvider::new()), &config);
//! let answer = composer.answer("What is this document about?").await?;
//! ```

/// Chat provider trait and role-tagged messages.
pub mod chat;

/// Document chunking strategies.
pub mod chunking;

/// Prompt assembly and answer generation.
pub mod composer;

/// Pipeline configuration.
pub mod config;

/// Document, chunk, and result types.
pub mod document;

/// Embedding provider trait.
pub mod embedding;

/// Error types.
pub mod error;

/// In-memory vector index.
pub mod inmemory;

/// Document loading from source files.
pub mod loader;

/// Ollama-backed providers.
pub mod ollama;

/// Ingestion orchestration.
pub mod pipeline;

/// Similarity-based retrieval.
pub mod retriever;

/// Vector index trait.
pub mod vectorstore;

pub use chat::{ChatProvider, Message, Role};
pub use chunking::{Chunker, RecursiveChunker};
pub use composer::{AnswerComposer, PromptTemplate};
pub use config::{RagConfig, RagConfigBuilder};
pub use document::{Chunk, Document, IngestionReport, SearchResult};
pub use embedding::EmbeddingProvider;
pub use error::{RagError, Result};
pub use inmemory::InMemoryVectorIndex;
pub use loader::{DocumentLoader, PdfLoader};
pub use ollama::{OllamaChatProvider, OllamaEmbeddingProvider};
pub use pipeline::{IngestionPipeline, IngestionPipelineBuilder};
pub use retriever::Retriever;
pub use vectorstore::VectorIndex;
