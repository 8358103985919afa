use serde::{Deserialize, Serialize};

use crate::error::MatchError;

/// Runtime configuration for the embedder: which mode to run and how to
/// post-process vectors.
///
/// Two modes exist:
///
/// - `"hash"` — deterministic local projection, no model assets, no network.
///   The default; good enough for matching short item descriptions and the
///   only mode exercised in CI.
/// - `"api"` — remote feature-extraction endpoint (Hugging Face router,
///   OpenAI-compatible, or a custom shape).
///
/// Unknown modes fall back to `"hash"` rather than failing: a misconfigured
/// embedder should degrade, not take post creation down with it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmbedConfig {
    /// Mode selector: `"hash"` (local) or `"api"` (remote HTTP).
    #[serde(default = "default_mode")]
    pub mode: String,
    /// Friendly label surfaced on every [`Embedding`](crate::Embedding).
    #[serde(default = "default_model_name")]
    pub model_name: String,
    /// Output dimension for hash mode. Api mode takes whatever the endpoint
    /// returns.
    #[serde(default = "default_dim")]
    pub dim: usize,
    /// Inference endpoint when [`mode`](Self::mode) is `"api"`.
    #[serde(default)]
    pub api_url: Option<String>,
    /// Authorization header value (e.g., `"Bearer hf_xxx"`).
    #[serde(default)]
    pub api_auth_header: Option<String>,
    /// Remote provider hint: `"hf"`, `"openai"`, or `"custom"` (default).
    #[serde(default)]
    pub api_provider: Option<String>,
    /// Overall API timeout in seconds.
    #[serde(default = "default_timeout")]
    pub api_timeout_secs: u64,
    /// Attempts per API call, including the first. Retries use jittered
    /// exponential backoff.
    #[serde(default = "default_retry_attempts")]
    pub retry_attempts: u32,
    /// Normalize vectors to unit length (recommended for cosine similarity).
    #[serde(default = "default_true")]
    pub normalize: bool,
}

impl Default for EmbedConfig {
    fn default() -> Self {
        Self {
            mode: default_mode(),
            model_name: default_model_name(),
            dim: default_dim(),
            api_url: None,
            api_auth_header: None,
            api_provider: None,
            api_timeout_secs: default_timeout(),
            retry_attempts: default_retry_attempts(),
            normalize: true,
        }
    }
}

impl EmbedConfig {
    pub fn validate(&self) -> Result<(), MatchError> {
        if self.dim == 0 {
            return Err(MatchError::InvalidConfig("dim must be >= 1".into()));
        }
        if self.mode == "api" && self.api_url.is_none() {
            return Err(MatchError::InvalidConfig(
                "api_url is required for api mode".into(),
            ));
        }
        if self.retry_attempts == 0 {
            return Err(MatchError::InvalidConfig(
                "retry_attempts must be >= 1".into(),
            ));
        }
        Ok(())
    }
}

/// Configuration for the matching engine itself.
///
/// `threshold` is the single tunable of the engine: the minimum cosine
/// similarity for a candidate to count as a match. Cheap to clone and
/// serde-friendly so surrounding services can embed it in their own configs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EngineConfig {
    /// Minimum similarity score for a candidate to survive filtering.
    #[serde(default = "default_threshold")]
    pub threshold: f32,
    /// Embedder configuration.
    #[serde(default)]
    pub embed: EmbedConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            embed: EmbedConfig::default(),
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), MatchError> {
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(MatchError::InvalidConfig(
                "threshold must be between 0.0 and 1.0".into(),
            ));
        }
        self.embed.validate()
    }
}

// Helper functions for serde defaults
fn default_mode() -> String {
    "hash".to_string()
}
fn default_model_name() -> String {
    "bge-small-en-v1.5".to_string()
}
fn default_dim() -> usize {
    384
}
fn default_timeout() -> u64 {
    30
}
fn default_retry_attempts() -> u32 {
    3
}
fn default_true() -> bool {
    true
}
fn default_threshold() -> f32 {
    0.7
}
