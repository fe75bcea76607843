//! Error types for the `pdfchat-rag` crate.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur in the ingestion and retrieval pipeline.
///
/// The core never catches and suppresses these; every failure propagates to
/// the ingestion or chat entry point as a distinguishable variant. Retry
/// policy is a caller concern.
#[derive(Debug, Error)]
pub enum RagError {
    /// Invalid configuration (chunk sizing, retrieval count, ...).
    #[error("Configuration error: {0}")]
    Config(String),

    /// The source file does not have a supported extension.
    #[error("Unsupported format: {} (expected a .pdf file)", path.display())]
    UnsupportedFormat {
        /// The rejected source path.
        path: PathBuf,
    },

    /// The source file could not be read or its text could not be extracted.
    #[error("Failed to load document {}: {message}", path.display())]
    DocumentLoad {
        /// The source path that failed to load.
        path: PathBuf,
        /// A description of the failure.
        message: String,
    },

    /// An error from the embedding provider.
    #[error("Embedding error ({provider}): {message}")]
    Embedding {
        /// The embedding provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// An error from the chat completion provider.
    #[error("Chat error ({provider}): {message}")]
    Chat {
        /// The chat provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// A write to the vector index failed. No chunk of the failed batch is
    /// visible to subsequent queries.
    #[error("Index write error ({backend}): {message}")]
    IndexWrite {
        /// The index backend that produced the error.
        backend: String,
        /// A description of the failure.
        message: String,
    },

    /// A query against the vector index failed.
    #[error("Index query error ({backend}): {message}")]
    IndexQuery {
        /// The index backend that produced the error.
        backend: String,
        /// A description of the failure.
        message: String,
    },

    /// The concatenated retrieval context exceeds the configured limit.
    /// Raised instead of silently truncating the prompt.
    #[error("Context too large: {length} chars exceeds the limit of {limit}")]
    ContextTooLarge {
        /// Length of the assembled context in characters.
        length: usize,
        /// The configured maximum context length.
        limit: usize,
    },
}

/// A convenience result type for pipeline operations.
pub type Result<T> = std::result::Result<T, RagError>;
