//! Embeddings and an in-memory vector index.

use async_trait::async_trait;
use fundamentals_core::{FundamentalsError, Result};
use std::fmt::Debug;
use tracing::debug;

use crate::chunk::chunk_text;

/// Most texts sent to the embedder in one call.
pub const EMBED_BATCH_SIZE: usize = 1000;

/// Turns texts into embedding vectors.
#[async_trait]
pub trait Embedder: Send + Sync + Debug {
    /// Embeds each text; the output has one vector per input, in order.
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;
}

/// A retrieved chunk and its similarity to the query.
#[derive(Clone, Debug, PartialEq)]
pub struct Passage {
    /// Chunk text.
    pub text: String,
    /// Cosine similarity to the query, in `[-1, 1]`.
    pub score: f32,
}

/// Cosine similarity of two vectors; 0 when either has zero length.
#[must_use]
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

/// Chunks held in memory with their embeddings.
#[derive(Clone, Debug, Default)]
pub struct VectorIndex {
    chunks: Vec<String>,
    vectors: Vec<Vec<f32>>,
}

impl VectorIndex {
    /// Chunks a document and embeds every chunk, at most
    /// [`EMBED_BATCH_SIZE`] chunks per embedder call.
    pub async fn embed_and_index(
        embedder: &dyn Embedder,
        document: &str,
        chunk_size: usize,
        overlap: usize,
    ) -> Result<Self> {
        let chunks = chunk_text(document, chunk_size, overlap);
        if chunks.is_empty() {
            return Ok(Self::default());
        }

        let mut vectors = Vec::with_capacity(chunks.len());
        for batch in chunks.chunks(EMBED_BATCH_SIZE) {
            let embedded = embedder.embed(batch).await?;
            if embedded.len() != batch.len() {
                return Err(FundamentalsError::MalformedPayload(format!(
                    "expected {} embeddings, got {}",
                    batch.len(),
                    embedded.len()
                )));
            }
            vectors.extend(embedded);
        }

        debug!(
            chunks = chunks.len(),
            batches = chunks.len().div_ceil(EMBED_BATCH_SIZE),
            "Indexed document"
        );
        Ok(Self { chunks, vectors })
    }

    /// Number of indexed chunks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// Returns true if nothing is indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Returns up to `k` chunks ranked by similarity to `query`, best first.
    pub async fn similarity_search(
        &self,
        embedder: &dyn Embedder,
        query: &str,
        k: usize,
    ) -> Result<Vec<Passage>> {
        if self.is_empty() || k == 0 {
            return Ok(Vec::new());
        }

        let query_vector = embedder
            .embed(&[query.to_string()])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| {
                FundamentalsError::MalformedPayload("no embedding for query".to_string())
            })?;

        let mut passages: Vec<Passage> = self
            .chunks
            .iter()
            .zip(&self.vectors)
            .map(|(text, vector)| Passage {
                text: text.clone(),
                score: cosine_similarity(&query_vector, vector),
            })
            .collect();
        passages.sort_by(|a, b| b.score.total_cmp(&a.score));
        passages.truncate(k);
        Ok(passages)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Counts occurrences of a few vocabulary words.
    #[derive(Debug)]
    pub(crate) struct KeywordEmbedder;

    const VOCAB: [&str; 4] = ["revenue", "debt", "employees", "growth"];

    #[async_trait]
    impl Embedder for KeywordEmbedder {
        async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
            Ok(texts
                .iter()
                .map(|t| {
                    let lower = t.to_lowercase();
                    VOCAB
                        .iter()
                        .map(|w| lower.matches(w).count() as f32)
                        .collect()
                })
                .collect())
        }
    }

    /// Records the size of every embed call.
    #[derive(Debug, Default)]
    struct CountingEmbedder {
        calls: Mutex<Vec<usize>>,
    }

    #[async_trait]
    impl Embedder for CountingEmbedder {
        async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
            self.calls.lock().unwrap().push(texts.len());
            Ok(texts.iter().map(|t| vec![t.len() as f32, 1.0]).collect())
        }
    }

    /// Returns one vector fewer than asked for.
    #[derive(Debug)]
    struct ShortEmbedder;

    #[async_trait]
    impl Embedder for ShortEmbedder {
        async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
            Ok(vec![vec![1.0]; texts.len().saturating_sub(1)])
        }
    }

    #[test]
    fn test_cosine_similarity() {
        assert!((cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]) - 1.0).abs() < 1e-6);
        assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).abs() < 1e-6);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
    }

    #[tokio::test]
    async fn test_search_ranks_best_first() {
        let document = "Headcount: employees rose to 300k.\n\n\
                        Revenue growth was 4.7% with revenue of 1.5T.\n\n\
                        Long-term debt was repaid.";
        let index = VectorIndex::embed_and_index(&KeywordEmbedder, document, 60, 0)
            .await
            .unwrap();
        assert_eq!(index.len(), 3);

        let hits = index
            .similarity_search(&KeywordEmbedder, "How did revenue growth look?", 2)
            .await
            .unwrap();
        assert_eq!(hits.len(), 2);
        assert!(hits[0].text.starts_with("Revenue growth"));
        assert!(hits[0].score >= hits[1].score);
    }

    #[tokio::test]
    async fn test_empty_index() {
        let index = VectorIndex::embed_and_index(&KeywordEmbedder, "", 100, 0)
            .await
            .unwrap();
        assert!(index.is_empty());
        let hits = index
            .similarity_search(&KeywordEmbedder, "revenue", 1)
            .await
            .unwrap();
        assert!(hits.is_empty());
    }

    #[tokio::test]
    async fn test_large_document_is_embedded_in_batches() {
        let paragraph = "a".repeat(900);
        let document = vec![paragraph; 3000].join("\n\n");
        let embedder = CountingEmbedder::default();

        let index = VectorIndex::embed_and_index(&embedder, &document, 1000, 0)
            .await
            .unwrap();

        assert_eq!(index.len(), 3000);
        assert_eq!(index.vectors.len(), 3000);
        let calls = embedder.calls.lock().unwrap();
        assert_eq!(*calls, vec![1000, 1000, 1000]);
        assert!(calls.iter().all(|&n| n <= EMBED_BATCH_SIZE));
    }

    #[tokio::test]
    async fn test_short_embedding_batch_is_malformed() {
        let err = VectorIndex::embed_and_index(&ShortEmbedder, "revenue\n\ndebt", 5, 0)
            .await
            .unwrap_err();
        assert!(err.is_malformed());
    }
}
