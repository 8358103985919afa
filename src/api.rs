//! Remote embedding over HTTP feature-extraction endpoints.
//!
//! Supports the Hugging Face router shape (`{"inputs": text}` → nested float
//! array), OpenAI-compatible endpoints (`{"input": text, "model": ...}` →
//! `data[].embedding`), and a custom shape for self-hosted encoders.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::config::EmbedConfig;
use crate::embedder::Embedder;
use crate::error::EmbedError;
use crate::normalize::l2_normalize_in_place;
use crate::types::Embedding;

#[derive(Clone, Copy)]
enum ProviderKind {
    HuggingFace,
    OpenAi,
    Custom,
}

impl ProviderKind {
    fn from_hint(hint: Option<&str>) -> Self {
        match hint.unwrap_or("custom").to_ascii_lowercase().as_str() {
            "hf" | "huggingface" => ProviderKind::HuggingFace,
            "openai" | "gpt" => ProviderKind::OpenAi,
            _ => ProviderKind::Custom,
        }
    }
}

/// [`Embedder`] backed by a remote inference endpoint.
///
/// Failed calls are retried with jittered exponential backoff up to the
/// configured attempt budget; the final failure surfaces as
/// [`EmbedError::Api`], which callers treat as "skip this post".
pub struct ApiEmbedder {
    client: reqwest::Client,
    url: String,
    auth_header: Option<String>,
    provider: ProviderKind,
    model_name: String,
    normalize: bool,
    retry_attempts: u32,
}

impl ApiEmbedder {
    pub fn from_config(cfg: &EmbedConfig) -> Result<Self, EmbedError> {
        let url = cfg
            .api_url
            .clone()
            .ok_or_else(|| EmbedError::InvalidConfig("api_url is required for api mode".into()))?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.api_timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| EmbedError::InvalidConfig(format!("http client: {e}")))?;

        Ok(Self {
            client,
            url,
            auth_header: cfg.api_auth_header.clone(),
            provider: ProviderKind::from_hint(cfg.api_provider.as_deref()),
            model_name: cfg.model_name.clone(),
            normalize: cfg.normalize,
            retry_attempts: cfg.retry_attempts.max(1),
        })
    }

    fn build_payload(&self, text: &str) -> Value {
        match self.provider {
            ProviderKind::HuggingFace => json!({ "inputs": text }),
            ProviderKind::OpenAi => json!({ "input": text, "model": self.model_name }),
            ProviderKind::Custom => json!({ "text": text }),
        }
    }

    async fn send_request(&self, payload: &Value) -> Result<Value, EmbedError> {
        let mut request = self
            .client
            .post(&self.url)
            .header("Content-Type", "application/json");
        if let Some(header) = self.auth_header.as_deref() {
            request = request.header("Authorization", header);
        }

        let response = request
            .json(payload)
            .send()
            .await
            .map_err(|e| EmbedError::Api(format!("HTTP request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(EmbedError::Api(format!("HTTP error {status}: {body}")));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| EmbedError::Api(format!("invalid JSON response: {e}")))
    }
}

#[async_trait]
impl Embedder for ApiEmbedder {
    async fn embed(&self, text: &str) -> Result<Embedding, EmbedError> {
        let payload = self.build_payload(text);

        let mut delay = Duration::from_millis(200);
        let mut last_err = None;
        for attempt in 1..=self.retry_attempts {
            match self.send_request(&payload).await {
                Ok(value) => {
                    let mut vector = parse_embedding_value(value)?;
                    if self.normalize {
                        l2_normalize_in_place(&mut vector);
                    }
                    return Ok(Embedding {
                        dim: vector.len(),
                        vector,
                        model_name: self.model_name.clone(),
                        normalized: self.normalize,
                    });
                }
                Err(err) => {
                    tracing::warn!(attempt, error = %err, "embedding api call failed");
                    last_err = Some(err);
                    if attempt < self.retry_attempts {
                        let jitter = Duration::from_millis(fastrand::u64(0..=delay.as_millis() as u64 / 2));
                        tokio::time::sleep(delay + jitter).await;
                        delay *= 2;
                    }
                }
            }
        }

        Err(last_err.unwrap_or_else(|| EmbedError::Api("no attempts executed".into())))
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}

/// Pull a single embedding vector out of the provider response. Accepts the
/// shapes observed in the wild: a bare float array, a nested array (batch of
/// one, or HF token-level output where we take the first row), an
/// `{"embeddings": [...]}` wrapper, or OpenAI's `{"data": [{"embedding":
/// [...]}]}`.
fn parse_embedding_value(value: Value) -> Result<Vec<f32>, EmbedError> {
    match value {
        Value::Array(items) => {
            if items.iter().all(Value::is_number) {
                return parse_float_array(items);
            }
            // Nested: batch-of-one or token-level rows. Take the first row.
            match items.into_iter().next() {
                Some(Value::Array(inner)) => parse_float_array(inner),
                _ => Err(EmbedError::Api("unexpected array shape in response".into())),
            }
        }
        Value::Object(mut map) => {
            if let Some(Value::Array(embeddings)) = map.remove("embeddings") {
                return match embeddings.into_iter().next() {
                    Some(Value::Array(inner)) => parse_float_array(inner),
                    Some(other) if other.is_number() => Err(EmbedError::Api(
                        "embeddings field must hold vectors, not scalars".into(),
                    )),
                    _ => Err(EmbedError::Api("empty embeddings field".into())),
                };
            }
            if let Some(Value::Array(data)) = map.remove("data") {
                if let Some(Value::Object(mut obj)) = data.into_iter().next() {
                    if let Some(Value::Array(inner)) = obj.remove("embedding") {
                        return parse_float_array(inner);
                    }
                }
                return Err(EmbedError::Api("missing embedding field in data item".into()));
            }
            Err(EmbedError::Api("response contained no embeddings".into()))
        }
        _ => Err(EmbedError::Api("unexpected response type".into())),
    }
}

fn parse_float_array(items: Vec<Value>) -> Result<Vec<f32>, EmbedError> {
    if items.is_empty() {
        return Err(EmbedError::Api("empty embedding vector".into()));
    }
    items
        .into_iter()
        .map(|v| {
            v.as_f64()
                .map(|f| f as f32)
                .ok_or_else(|| EmbedError::Api("non-numeric value in embedding".into()))
        })
        .collect()
}
