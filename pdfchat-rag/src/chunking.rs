//! Document chunking.
//!
//! This module provides the [`Chunker`] trait and [`RecursiveChunker`], a
//! splitter that walks the document greedily and prefers to cut at the
//! largest semantic boundary available: paragraph, then line, then sentence,
//! then word, falling back to a hard character cut.

use std::collections::HashMap;

use crate::document::{Chunk, Document};
use crate::error::{RagError, Result};

/// Boundary candidates, largest first. A separator stays attached to the
/// chunk that precedes it.
const SEPARATORS: [&str; 4] = ["\n\n", "\n", ". ", " "];

/// A strategy for splitting documents into chunks.
///
/// Implementations are pure functions of their input: no side effects, and
/// an empty document always yields an empty `Vec`. Returned chunks have an
/// empty `id` and an empty embedding; both are attached later by the
/// ingestion pipeline.
pub trait Chunker: Send + Sync {
    /// Split a document into ordered chunks.
    fn chunk(&self, document: &Document) -> Vec<Chunk>;
}

/// Greedy boundary-preferring splitter with exact overlap.
///
/// Each chunk takes up to `chunk_size` bytes, cutting at the largest
/// boundary found inside the window; the next chunk starts `chunk_overlap`
/// bytes before the cut, so adjacent chunks share exactly that many bytes
/// of context — one snap less where the backstep would land inside a UTF-8
/// code point, since cuts never split one. A document shorter than
/// `chunk_size` yields a single chunk with no overlap.
///
/// # Example
///
/// ```rust,ignore
/// use pdfchat_rag::RecursiveChunker;
///
/// let chunker = RecursiveChunker::new(1000, 300)?;
/// let chunks = chunker.chunk(&document);
/// ```
#[derive(Debug, Clone)]
pub struct RecursiveChunker {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl RecursiveChunker {
    /// Create a new `RecursiveChunker`.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Config`] if `chunk_size` is zero or
    /// `chunk_overlap` is not strictly smaller than `chunk_size`.
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(RagError::Config("chunk_size must be greater than zero".to_string()));
        }
        if chunk_overlap >= chunk_size {
            return Err(RagError::Config(format!(
                "chunk_overlap ({chunk_overlap}) must be less than chunk_size ({chunk_size})"
            )));
        }
        Ok(Self { chunk_size, chunk_overlap })
    }

    /// Pick the cut position for the window `[start, hard_end)`.
    ///
    /// Tries each separator class in order and takes the last occurrence in
    /// the window, provided the cut leaves the overlap region inside the
    /// chunk (so the next chunk still starts after this one). Falls back to
    /// the hard character cut.
    fn cut_point(&self, text: &str, start: usize, hard_end: usize) -> usize {
        let window = &text[start..hard_end];
        for separator in SEPARATORS {
            if let Some(pos) = window.rfind(separator) {
                let cut = start + pos + separator.len();
                if cut > start + self.chunk_overlap {
                    return cut;
                }
            }
        }
        hard_end
    }
}

/// Largest char boundary less than or equal to `index`.
fn prev_char_boundary(text: &str, mut index: usize) -> usize {
    while index > 0 && !text.is_char_boundary(index) {
        index -= 1;
    }
    index
}

/// Smallest char boundary greater than or equal to `index`.
fn next_char_boundary(text: &str, mut index: usize) -> usize {
    while index < text.len() && !text.is_char_boundary(index) {
        index += 1;
    }
    index
}

impl Chunker for RecursiveChunker {
    fn chunk(&self, document: &Document) -> Vec<Chunk> {
        if document.text.is_empty() {
            return Vec::new();
        }

        let text = &document.text;
        let mut chunks = Vec::new();
        let mut start = 0;

        let push = |chunks: &mut Vec<Chunk>, text: &str, offset: usize| {
            let mut metadata = HashMap::new();
            metadata.insert("chunk_index".to_string(), chunks.len().to_string());
            if let Some(path) = &document.source_path {
                metadata.insert("source".to_string(), path.display().to_string());
            }
            chunks.push(Chunk {
                id: String::new(),
                text: text.to_string(),
                embedding: Vec::new(),
                source_offset: Some(offset),
                metadata,
            });
        };

        loop {
            if text.len() - start <= self.chunk_size {
                push(&mut chunks, &text[start..], start);
                break;
            }

            let mut hard_end = prev_char_boundary(text, start + self.chunk_size);
            if hard_end <= start {
                // chunk_size smaller than the next code point; take it whole
                hard_end = start
                    + text[start..].chars().next().map(char::len_utf8).unwrap_or(1);
            }
            let end = self.cut_point(text, start, hard_end);
            push(&mut chunks, &text[start..end], start);

            // Snapping forward keeps the shared region at most
            // `chunk_overlap` bytes when the backstep would split a
            // code point.
            let next = next_char_boundary(text, end.saturating_sub(self.chunk_overlap));
            // Overlap would swallow the whole chunk; continue without it.
            start = if next > start { next } else { end };
        }

        chunks
    }
}
