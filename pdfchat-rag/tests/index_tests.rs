//! Property and unit tests for the in-memory vector index.

use std::collections::HashMap;

use pdfchat_rag::document::Chunk;
use pdfchat_rag::error::RagError;
use pdfchat_rag::inmemory::InMemoryVectorIndex;
use pdfchat_rag::vectorstore::VectorIndex;
use proptest::prelude::*;

fn chunk(id: &str, embedding: Vec<f32>) -> Chunk {
    Chunk {
        id: id.to_string(),
        text: format!("text of {id}"),
        embedding,
        source_offset: None,
        metadata: HashMap::new(),
    }
}

/// Generate a non-zero L2-normalized embedding of the given dimension.
fn arb_normalized_embedding(dim: usize) -> impl Strategy<Value = Vec<f32>> {
    proptest::collection::vec(-1.0f32..1.0f32, dim).prop_filter_map("non-zero embedding", |mut v| {
        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm < 1e-8 {
            return None;
        }
        for val in &mut v {
            *val /= norm;
        }
        Some(v)
    })
}

const DIM: usize = 16;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Search returns at most `k` results ordered by descending score.
    #[test]
    fn query_ordered_descending_and_bounded_by_k(
        embeddings in proptest::collection::vec(arb_normalized_embedding(DIM), 1..20),
        query in arb_normalized_embedding(DIM),
        k in 1usize..25,
    ) {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let (results, stored) = rt.block_on(async {
            let index = InMemoryVectorIndex::new();
            let chunks: Vec<Chunk> = embeddings
                .into_iter()
                .enumerate()
                .map(|(i, e)| chunk(&format!("c{i}"), e))
                .collect();
            let stored = chunks.len();
            index.upsert(&chunks).await.unwrap();
            (index.query(&query, k).await.unwrap(), stored)
        });

        prop_assert!(results.len() <= k);
        prop_assert!(results.len() <= stored);
        for window in results.windows(2) {
            prop_assert!(window[0].score >= window[1].score);
        }
    }
}

#[tokio::test]
async fn repeated_queries_return_identical_results() {
    let index = InMemoryVectorIndex::new();
    index
        .upsert(&[
            chunk("a", vec![1.0, 0.0, 0.0]),
            chunk("b", vec![0.0, 1.0, 0.0]),
            chunk("c", vec![0.7, 0.7, 0.0]),
        ])
        .await
        .unwrap();

    let query = vec![0.9, 0.1, 0.0];
    let first = index.query(&query, 3).await.unwrap();
    let second = index.query(&query, 3).await.unwrap();

    let ids = |results: &[pdfchat_rag::document::SearchResult]| {
        results.iter().map(|r| r.chunk.id.clone()).collect::<Vec<_>>()
    };
    assert_eq!(ids(&first), ids(&second));
}

#[tokio::test]
async fn score_ties_resolve_to_earliest_inserted_chunk() {
    let index = InMemoryVectorIndex::new();
    // Identical embeddings, so identical scores against any query.
    index
        .upsert(&[
            chunk("second-batch-loser", vec![0.5, 0.5]),
            chunk("same-a", vec![1.0, 0.0]),
            chunk("same-b", vec![1.0, 0.0]),
        ])
        .await
        .unwrap();

    let results = index.query(&[1.0, 0.0], 2).await.unwrap();
    assert_eq!(results[0].chunk.id, "same-a");
    assert_eq!(results[1].chunk.id, "same-b");
}

#[tokio::test]
async fn empty_index_returns_empty_result() {
    let index = InMemoryVectorIndex::new();
    let results = index.query(&[1.0, 2.0, 3.0], 5).await.unwrap();
    assert!(results.is_empty());
    assert_eq!(index.count().await.unwrap(), 0);
}

#[tokio::test]
async fn failed_upsert_leaves_no_partial_batch() {
    let index = InMemoryVectorIndex::new();
    let batch = vec![
        chunk("good-1", vec![1.0, 0.0]),
        chunk("good-2", vec![0.0, 1.0]),
        chunk("bad", Vec::new()),
    ];

    let err = index.upsert(&batch).await.unwrap_err();
    assert!(matches!(err, RagError::IndexWrite { .. }));

    assert_eq!(index.count().await.unwrap(), 0);
    assert!(index.query(&[1.0, 0.0], 10).await.unwrap().is_empty());
}

#[tokio::test]
async fn dimension_mismatch_rejects_whole_batch() {
    let index = InMemoryVectorIndex::new();
    index.upsert(&[chunk("a", vec![1.0, 0.0])]).await.unwrap();

    let err = index
        .upsert(&[chunk("b", vec![0.0, 1.0]), chunk("c", vec![1.0, 0.0, 0.0])])
        .await
        .unwrap_err();
    assert!(matches!(err, RagError::IndexWrite { .. }));
    assert_eq!(index.count().await.unwrap(), 1);
}

#[tokio::test]
async fn query_dimension_mismatch_is_an_error() {
    let index = InMemoryVectorIndex::new();
    index.upsert(&[chunk("a", vec![1.0, 0.0])]).await.unwrap();

    let err = index.query(&[1.0, 0.0, 0.0], 1).await.unwrap_err();
    assert!(matches!(err, RagError::IndexQuery { .. }));
}

#[tokio::test]
async fn upsert_replaces_existing_id_in_place() {
    let index = InMemoryVectorIndex::new();
    index
        .upsert(&[chunk("a", vec![1.0, 0.0]), chunk("b", vec![0.0, 1.0])])
        .await
        .unwrap();
    index.upsert(&[chunk("a", vec![0.0, 1.0])]).await.unwrap();

    assert_eq!(index.count().await.unwrap(), 2);
    let results = index.query(&[0.0, 1.0], 2).await.unwrap();
    // Both now score 1.0; "a" kept its original slot, so it still wins ties.
    assert_eq!(results[0].chunk.id, "a");
}

#[tokio::test]
async fn clear_empties_the_index_and_resets_dimensions() {
    let index = InMemoryVectorIndex::new();
    index.upsert(&[chunk("a", vec![1.0, 0.0])]).await.unwrap();
    index.clear().await.unwrap();

    assert_eq!(index.count().await.unwrap(), 0);
    // A different dimension is accepted after a rebuild.
    index.upsert(&[chunk("b", vec![1.0, 0.0, 0.0])]).await.unwrap();
    assert_eq!(index.count().await.unwrap(), 1);
}
