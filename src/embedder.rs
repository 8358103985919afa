use std::sync::Arc;

use async_trait::async_trait;
use fxhash::hash64;

use crate::api::ApiEmbedder;
use crate::config::EmbedConfig;
use crate::error::EmbedError;
use crate::normalize::l2_normalize_in_place;
use crate::types::Embedding;

/// Turns text into a fixed-length vector.
///
/// This is the injection seam for the engine: production wires a real
/// embedder, tests wire deterministic or failing doubles. Implementations
/// must be deterministic — the same text yields the same vector for the
/// lifetime of the process.
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Embedding, EmbedError>;

    /// Label surfaced on produced embeddings.
    fn model_name(&self) -> &str;
}

/// Deterministic local embedder: projects a 64-bit hash of the text into a
/// sinusoid-valued vector. No model assets, no network, reproducible across
/// processes. Captures token-free lexical identity well enough that equal
/// texts score 1.0 and unrelated texts stay well under typical thresholds.
#[derive(Debug, Clone)]
pub struct HashEmbedder {
    dim: usize,
    normalize: bool,
    model_name: String,
}

impl HashEmbedder {
    pub fn new(dim: usize, normalize: bool, model_name: impl Into<String>) -> Self {
        Self {
            dim,
            normalize,
            model_name: model_name.into(),
        }
    }

    pub fn from_config(cfg: &EmbedConfig) -> Self {
        Self::new(cfg.dim, cfg.normalize, cfg.model_name.clone())
    }

    fn project(&self, text: &str) -> Vec<f32> {
        let mut v = vec![0f32; self.dim];
        let h = hash64(text.as_bytes());
        for (idx, value) in v.iter_mut().enumerate() {
            *value = ((h >> (idx % 32)) as f32 * 0.0001).sin();
        }
        if self.normalize {
            l2_normalize_in_place(&mut v);
        }
        v
    }
}

impl Default for HashEmbedder {
    fn default() -> Self {
        Self::from_config(&EmbedConfig::default())
    }
}

#[async_trait]
impl Embedder for HashEmbedder {
    async fn embed(&self, text: &str) -> Result<Embedding, EmbedError> {
        let vector = self.project(text);
        Ok(Embedding {
            dim: vector.len(),
            vector,
            model_name: self.model_name.clone(),
            normalized: self.normalize,
        })
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}

/// Build an embedder from config. Unknown modes fall back to hash mode so a
/// typo in deployment config degrades instead of blocking post creation.
pub fn build_embedder(cfg: &EmbedConfig) -> Result<Arc<dyn Embedder>, EmbedError> {
    match cfg.mode.as_str() {
        "api" => Ok(Arc::new(ApiEmbedder::from_config(cfg)?)),
        "hash" => Ok(Arc::new(HashEmbedder::from_config(cfg))),
        other => {
            tracing::warn!(mode = other, "unknown embed mode, falling back to hash");
            Ok(Arc::new(HashEmbedder::from_config(cfg)))
        }
    }
}
