//! Semantic matching for lost-and-found reports.
//!
//! When someone posts a lost item, this crate finds the found reports that
//! probably describe the same thing (and vice versa). Item name and
//! description get embedded into a vector, candidates of the opposite type
//! get scored by cosine similarity, and everything above a threshold comes
//! back ranked. The caller notifies both owners about the top hit.
//!
//! Two embedding modes:
//!
//! - **Hash mode** - Deterministic local projection. No model files, no
//!   network. The default, and what CI runs.
//! - **API mode** - Call out to a feature-extraction endpoint (Hugging Face
//!   router, OpenAI-compatible, or custom).
//!
//! The failure posture matters more than the math here: a post that can't
//! be embedded is skipped with a warning, a candidate that can't be embedded
//! doesn't sink the batch, and a matching pass that fails never fails the
//! post creation that triggered it. Only systemic things — the candidate
//! pool fetch, notification persistence — surface as errors.
//!
//! ## Quick example
//!
//! ```no_run
//! use reclaim_match::{EngineConfig, MatchEngine, Post, ReportType};
//!
//! #[tokio::main]
//! async fn main() {
//!     let engine = MatchEngine::new(EngineConfig::default()).unwrap();
//!
//!     let new_post = Post {
//!         id: 10,
//!         user_id: 1,
//!         report_type: ReportType::Lost,
//!         item_name: "black wallet".into(),
//!         description: "leather, near library".into(),
//!     };
//!
//!     // Candidate pool comes from your storage layer.
//!     let pool: Vec<Post> = vec![];
//!     let matches = engine.find_matches(&new_post, &pool).await;
//!     if let Some(top) = matches.first() {
//!         println!("best match: post {} at {:.2}", top.post.id, top.score);
//!     }
//! }
//! ```
//!
//! Embeddings are cached per post id for the process lifetime, so repeat
//! passes over the same corpus only pay for new posts.

pub mod config;
pub mod error;
pub mod types;

mod api;
mod cache;
mod embedder;
mod engine;
mod memory;
mod normalize;
mod notify;
mod score;

pub use crate::api::ApiEmbedder;
pub use crate::cache::EmbeddingCache;
pub use crate::config::{EmbedConfig, EngineConfig};
pub use crate::embedder::{build_embedder, Embedder, HashEmbedder};
pub use crate::engine::{CandidateSource, MatchEngine, MatchOutcome};
pub use crate::error::{EmbedError, MatchError, NotifyError};
pub use crate::memory::{
    in_memory_collaborators, InMemoryNotificationStore, InMemoryPostStore, InMemoryUserDirectory,
};
pub use crate::notify::{NotificationStore, Notifier, UserDirectory};
pub use crate::score::cosine_similarity;
pub use crate::types::{
    Embedding, Match, Notification, NotificationKind, Post, ReportType, User,
};
