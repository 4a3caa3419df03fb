//! In-memory vector index over uploaded passages.

use buddy_models::Passage;
use buddy_utils::{BuddyError, BuddyResult};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::ollama_client::EmbeddingService;

#[derive(Debug, Clone)]
struct IndexedPassage {
    passage: Passage,
    embedding: Vec<f32>,
}

/// Cosine similarity, 0.0 for mismatched or zero vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a * norm_b)
}

#[derive(Clone)]
pub struct VectorIndex {
    embedder: Arc<dyn EmbeddingService>,
    entries: Arc<RwLock<Vec<IndexedPassage>>>,
}

impl VectorIndex {
    pub fn new(embedder: Arc<dyn EmbeddingService>) -> Self {
        Self {
            embedder,
            entries: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Drops everything indexed so far and indexes `passages` instead.
    pub async fn replace(&self, passages: Vec<Passage>) -> BuddyResult<usize> {
        let texts: Vec<String> = passages.iter().map(|p| p.content.clone()).collect();
        let embeddings = self
            .embedder
            .embed_batch(&texts)
            .await
            .map_err(|e| BuddyError::retrieval(format!("Failed to embed passages: {}", e)))?;

        let indexed: Vec<IndexedPassage> = passages
            .into_iter()
            .zip(embeddings)
            .map(|(passage, embedding)| IndexedPassage { passage, embedding })
            .collect();
        let count = indexed.len();

        *self.entries.write().await = indexed;
        info!(passages = count, "Vector index rebuilt");
        Ok(count)
    }

    /// Up to `top_k` passages closest to `query`, restricted to `note_id` when given.
    pub async fn search(&self, query: &str, top_k: usize, note_id: Option<&str>) -> BuddyResult<Vec<Passage>> {
        if self.is_empty().await || top_k == 0 {
            return Ok(Vec::new());
        }

        let query_embedding = self
            .embedder
            .embed(query)
            .await
            .map_err(|e| BuddyError::retrieval(format!("Failed to embed query: {}", e)))?;

        let entries = self.entries.read().await;
        let mut scored: Vec<(f32, &IndexedPassage)> = entries
            .iter()
            .filter(|entry| note_id.map_or(true, |id| entry.passage.note_id.as_deref() == Some(id)))
            .map(|entry| (cosine_similarity(&query_embedding, &entry.embedding), entry))
            .collect();
        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

        let hits: Vec<Passage> = scored
            .into_iter()
            .take(top_k)
            .map(|(_, entry)| entry.passage.clone())
            .collect();
        debug!(query_len = query.len(), hits = hits.len(), note_id = ?note_id, "Retrieval finished");
        Ok(hits)
    }
}
