//! Data types for documents, chunks, and retrieval results.

use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Raw text extracted from a source file.
///
/// A `Document` lives for the duration of one ingestion run; once it has
/// been chunked, only the chunks persist.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Path of the file the text was extracted from, if any.
    pub source_path: Option<PathBuf>,
    /// The extracted text content.
    pub text: String,
}

impl Document {
    /// Create a document from raw text with no source path.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self { source_path: None, text: text.into() }
    }
}

/// A contiguous text segment of a [`Document`] with its vector embedding.
///
/// Chunks are never mutated after ingestion and never deleted individually;
/// the only deletion path is a whole-index rebuild.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Chunk {
    /// Unique identifier, assigned by the ingestion pipeline.
    pub id: String,
    /// The text content of the chunk.
    pub text: String,
    /// The vector embedding for this chunk's text. Empty until the
    /// pipeline attaches it.
    pub embedding: Vec<f32>,
    /// Byte offset of this chunk in the source document text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_offset: Option<usize>,
    /// Key-value metadata (chunk index, source path, ...).
    pub metadata: HashMap<String, String>,
}

/// A retrieved [`Chunk`] paired with a similarity score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    /// The retrieved chunk.
    pub chunk: Chunk,
    /// The similarity score (higher is more relevant).
    pub score: f32,
}

/// Summary of a completed ingestion run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestionReport {
    /// Number of chunks embedded and stored.
    pub chunk_count: usize,
}
