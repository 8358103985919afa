use std::error::Error as StdError;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::cache::EmbeddingCache;
use crate::config::EngineConfig;
use crate::embedder::{build_embedder, Embedder};
use crate::error::MatchError;
use crate::notify::Notifier;
use crate::score::cosine_similarity;
use crate::types::{Match, Notification, Post, ReportType};


type BoxError = Box<dyn StdError + Send + Sync>;

/// Supplies the candidate pool for a matching pass. The engine never
/// queries storage itself; the persistence layer implements this seam.
#[async_trait]
pub trait CandidateSource: Send + Sync {
    async fn posts_of_type(&self, report_type: ReportType) -> Result<Vec<Post>, BoxError>;
}

/// Result of a full matching pass: the ranked matches and, when the top
/// match cleared the threshold and both owners resolved, the notification
/// pair that was persisted.
#[derive(Debug)]
pub struct MatchOutcome {
    pub matches: Vec<Match>,
    pub notifications: Option<(Notification, Notification)>,
}

/// Matching engine: embeds a new post, scores it against opposite-type
/// candidates, and ranks everything above the threshold.
///
/// One engine instance is shared across request handlers; the embedder and
/// cache inside it are the only mutable state and both tolerate concurrent
/// passes.
pub struct MatchEngine {
    embedder: Arc<dyn Embedder>,
    cache: EmbeddingCache,
    config: EngineConfig,
}

impl MatchEngine {
    /// Construct an engine with an explicit embedder, for callers that wire
    /// their own (tests, custom models).
    pub fn with_embedder(
        embedder: Arc<dyn Embedder>,
        config: EngineConfig,
    ) -> Result<Self, MatchError> {
        config.validate()?;
        Ok(Self {
            embedder,
            cache: EmbeddingCache::new(),
            config,
        })
    }

    /// Construct an engine from config alone, building the embedder from
    /// `config.embed`.
    pub fn new(config: EngineConfig) -> Result<Self, MatchError> {
        config.validate()?;
        let embedder =
            build_embedder(&config.embed).map_err(|e| MatchError::InvalidConfig(e.to_string()))?;
        Ok(Self {
            embedder,
            cache: EmbeddingCache::new(),
            config,
        })
    }

    pub fn cache(&self) -> &EmbeddingCache {
        &self.cache
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Rank `pool` against `post` using the configured threshold.
    pub async fn find_matches(&self, post: &Post, pool: &[Post]) -> Vec<Match> {
        self.find_matches_with_threshold(post, pool, self.config.threshold)
            .await
    }

    /// Rank `pool` against `post` with an explicit threshold.
    ///
    /// Never fails on data-quality issues: a post that cannot be embedded
    /// yields an empty result, a candidate that cannot be embedded is
    /// skipped, and an empty pool is an empty result. Candidates are scored
    /// in pool order and the final sort is stable, so equal scores keep
    /// pool order — the ranking is reproducible given identical inputs and
    /// cache state.
    pub async fn find_matches_with_threshold(
        &self,
        post: &Post,
        pool: &[Post],
        threshold: f32,
    ) -> Vec<Match> {
        let wanted = post.report_type.opposite();

        let own_embedding = match self
            .cache
            .get_or_compute(post.id, &post.embed_text(), self.embedder.as_ref())
            .await
        {
            Some(e) => e,
            None => {
                warn!(post_id = post.id, "post has no embedding, skipping matching");
                return Vec::new();
            }
        };

        let mut matches = Vec::new();
        for candidate in pool {
            // Guards against a pool that wasn't pre-filtered, and against
            // the post matching itself.
            if candidate.id == post.id || candidate.report_type != wanted {
                continue;
            }

            let candidate_embedding = match self
                .cache
                .get_or_compute(candidate.id, &candidate.embed_text(), self.embedder.as_ref())
                .await
            {
                Some(e) => e,
                None => continue,
            };

            let score = cosine_similarity(&own_embedding.vector, &candidate_embedding.vector);
            if score >= threshold {
                matches.push(Match {
                    post: candidate.clone(),
                    score,
                });
            }
        }

        // Stable sort: ties keep pool order.
        matches.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        info!(
            post_id = post.id,
            candidates = pool.len(),
            matches = matches.len(),
            "matching pass complete"
        );
        matches
    }

    /// Full matching pass for a newly created post: fetch the opposite-type
    /// pool from `source`, rank it, and notify on the top match.
    ///
    /// A pool fetch failure is fatal for the pass; so is a notification
    /// persistence failure. Zero matches, an unembeddable post, and
    /// unresolvable owners all degrade to an outcome without notifications.
    pub async fn run_match_pass(
        &self,
        post: &Post,
        source: &dyn CandidateSource,
        notifier: &Notifier,
    ) -> Result<MatchOutcome, MatchError> {
        let wanted = post.report_type.opposite();
        let pool = source
            .posts_of_type(wanted)
            .await
            .map_err(|e| MatchError::CandidatePool(e.to_string()))?;

        if pool.is_empty() {
            info!(post_id = post.id, report_type = %wanted, "no candidates to match against");
            return Ok(MatchOutcome {
                matches: Vec::new(),
                notifications: None,
            });
        }

        let matches = self.find_matches(post, &pool).await;

        let notifications = match matches.first() {
            Some(top) => notifier.notify_match(post, &top.post, top.score).await?,
            None => None,
        };

        Ok(MatchOutcome {
            matches,
            notifications,
        })
    }
}
