//! Integration tests for the ingestion pipeline.

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use pdfchat_rag::chunking::RecursiveChunker;
use pdfchat_rag::config::RagConfig;
use pdfchat_rag::document::Document;
use pdfchat_rag::embedding::EmbeddingProvider;
use pdfchat_rag::error::{RagError, Result};
use pdfchat_rag::inmemory::InMemoryVectorIndex;
use pdfchat_rag::loader::{DocumentLoader, PdfLoader};
use pdfchat_rag::pipeline::IngestionPipeline;
use pdfchat_rag::vectorstore::VectorIndex;

/// Serves a fixed text for any source path.
struct StaticLoader(String);

impl DocumentLoader for StaticLoader {
    fn load(&self, source: &Path) -> Result<Document> {
        Ok(Document { source_path: Some(source.to_path_buf()), text: self.0.clone() })
    }
}

/// Deterministic embedder: a tiny bag-of-bytes vector, no model needed.
struct HashEmbedder;

#[async_trait]
impl EmbeddingProvider for HashEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut v = vec![1.0f32; 4];
        for (i, b) in text.bytes().enumerate() {
            v[i % 4] += f32::from(b) / 255.0;
        }
        Ok(v)
    }

    fn dimensions(&self) -> usize {
        4
    }
}

/// Embedder whose vectors are shorter than its declared dimensionality.
struct LyingEmbedder;

#[async_trait]
impl EmbeddingProvider for LyingEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
        Ok(vec![1.0; 4])
    }

    fn dimensions(&self) -> usize {
        8
    }
}

/// Embedder that always fails.
struct BrokenEmbedder;

#[async_trait]
impl EmbeddingProvider for BrokenEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
        Err(RagError::Embedding {
            provider: "Broken".to_string(),
            message: "model unavailable".to_string(),
        })
    }

    fn dimensions(&self) -> usize {
        4
    }
}

fn pipeline_for(
    text: &str,
    config: RagConfig,
    index: Arc<InMemoryVectorIndex>,
) -> IngestionPipeline {
    IngestionPipeline::builder()
        .loader(Arc::new(StaticLoader(text.to_string())))
        .chunker(Arc::new(
            RecursiveChunker::new(config.chunk_size, config.chunk_overlap).unwrap(),
        ))
        .embedding_provider(Arc::new(HashEmbedder))
        .index(index)
        .build()
        .unwrap()
}

#[tokio::test]
async fn ingests_2500_chars_into_four_chunks() {
    // 2,500 characters with no separators: pure window stepping.
    let text = "x".repeat(2500);
    let config =
        RagConfig::builder().chunk_size(1000).chunk_overlap(300).build().unwrap();
    let index = Arc::new(InMemoryVectorIndex::new());
    let pipeline = pipeline_for(&text, config, index.clone());

    let report = pipeline.ingest(Path::new("doc.pdf")).await.unwrap();

    assert_eq!(report.chunk_count, 4);
    assert_eq!(index.count().await.unwrap(), 4);

    // Every stored chunk carries an embedding and respects the size bound.
    let results = index.query(&[1.0, 1.0, 1.0, 1.0], 10).await.unwrap();
    assert_eq!(results.len(), 4);
    for result in &results {
        assert_eq!(result.chunk.embedding.len(), 4);
        assert!(result.chunk.text.len() <= 1000);
    }
}

#[tokio::test]
async fn chunk_ids_are_unique() {
    let text = "word ".repeat(2000);
    let index = Arc::new(InMemoryVectorIndex::new());
    let pipeline = pipeline_for(&text, RagConfig::default(), index.clone());

    let report = pipeline.ingest(Path::new("doc.pdf")).await.unwrap();
    assert!(report.chunk_count > 1);

    let results = index.query(&[1.0, 1.0, 1.0, 1.0], report.chunk_count).await.unwrap();
    let ids: HashSet<String> = results.iter().map(|r| r.chunk.id.clone()).collect();
    assert_eq!(ids.len(), report.chunk_count);
}

#[tokio::test]
async fn empty_document_is_a_no_op() {
    let index = Arc::new(InMemoryVectorIndex::new());
    let pipeline = pipeline_for("", RagConfig::default(), index.clone());

    let report = pipeline.ingest(Path::new("doc.pdf")).await.unwrap();
    assert_eq!(report.chunk_count, 0);
    assert_eq!(index.count().await.unwrap(), 0);
}

#[tokio::test]
async fn embedding_failure_leaves_index_empty() {
    let index = Arc::new(InMemoryVectorIndex::new());
    let pipeline = IngestionPipeline::builder()
        .loader(Arc::new(StaticLoader("some document text".to_string())))
        .chunker(Arc::new(RecursiveChunker::new(1000, 300).unwrap()))
        .embedding_provider(Arc::new(BrokenEmbedder))
        .index(index.clone())
        .build()
        .unwrap();

    let err = pipeline.ingest(Path::new("doc.pdf")).await.unwrap_err();
    assert!(matches!(err, RagError::Embedding { .. }));
    assert_eq!(index.count().await.unwrap(), 0);
}

#[tokio::test]
async fn wrong_dimensionality_from_provider_fails_ingestion() {
    let index = Arc::new(InMemoryVectorIndex::new());
    let pipeline = IngestionPipeline::builder()
        .loader(Arc::new(StaticLoader("some document text".to_string())))
        .chunker(Arc::new(RecursiveChunker::new(1000, 300).unwrap()))
        .embedding_provider(Arc::new(LyingEmbedder))
        .index(index.clone())
        .build()
        .unwrap();

    let err = pipeline.ingest(Path::new("doc.pdf")).await.unwrap_err();
    assert!(matches!(err, RagError::Embedding { .. }));
    assert!(err.to_string().contains("8 dimensions"));
    assert_eq!(index.count().await.unwrap(), 0);
}

#[tokio::test]
async fn builder_rejects_missing_fields() {
    let err = IngestionPipeline::builder()
        .loader(Arc::new(StaticLoader(String::new())))
        .build()
        .unwrap_err();
    assert!(matches!(err, RagError::Config(_)));
}

#[test]
fn pdf_loader_rejects_non_pdf_extension() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.txt");
    std::fs::write(&path, "plain text").unwrap();

    let loader = PdfLoader::new(dir.path());
    let err = loader.load(Path::new("notes.txt")).unwrap_err();
    assert!(matches!(err, RagError::UnsupportedFormat { .. }));
}

#[test]
fn pdf_loader_rejects_extensionless_path() {
    let loader = PdfLoader::new("data");
    let err = loader.load(Path::new("document")).unwrap_err();
    assert!(matches!(err, RagError::UnsupportedFormat { .. }));
}

#[test]
fn pdf_loader_reports_unreadable_file() {
    let dir = tempfile::tempdir().unwrap();
    let loader = PdfLoader::new(dir.path());
    let err = loader.load(Path::new("missing.pdf")).unwrap_err();
    assert!(matches!(err, RagError::DocumentLoad { .. }));
}
