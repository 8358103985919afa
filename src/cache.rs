use std::sync::Arc;

use dashmap::DashMap;
use tracing::{debug, warn};

use crate::embedder::Embedder;
use crate::types::Embedding;

/// Process-lifetime cache of post embeddings, keyed by post id.
///
/// Concurrent matching passes share one instance. The map is shard-locked,
/// so uncoordinated writers cannot corrupt it; two passes racing on the same
/// missing key may both compute, and last-writer-wins is fine because the
/// value is a deterministic function of the text. Failures are never cached,
/// so the next call retries.
///
/// Keyed by post identity rather than text: an edited post keeps its stale
/// vector until the process restarts. No eviction — entries for deleted
/// posts linger. Both are accepted limitations of this backing store.
#[derive(Default)]
pub struct EmbeddingCache {
    entries: DashMap<i64, Arc<Embedding>>,
}

impl EmbeddingCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cache-first lookup: return the stored vector for `post_id`, or embed
    /// `text` and store the result. Returns `None` when the embedder fails,
    /// leaving the key absent.
    pub async fn get_or_compute(
        &self,
        post_id: i64,
        text: &str,
        embedder: &dyn Embedder,
    ) -> Option<Arc<Embedding>> {
        if let Some(entry) = self.entries.get(&post_id) {
            return Some(entry.clone());
        }

        match embedder.embed(text).await {
            Ok(embedding) => {
                let embedding = Arc::new(embedding);
                self.entries.insert(post_id, embedding.clone());
                debug!(post_id, dim = embedding.dim, "cached embedding");
                Some(embedding)
            }
            Err(err) => {
                warn!(post_id, error = %err, "could not generate embedding");
                None
            }
        }
    }

    /// Read-only lookup without computing.
    pub fn get(&self, post_id: i64) -> Option<Arc<Embedding>> {
        self.entries.get(&post_id).map(|e| e.clone())
    }

    pub fn contains(&self, post_id: i64) -> bool {
        self.entries.contains_key(&post_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
