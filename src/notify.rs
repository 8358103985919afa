//! Cross-user notifications for matched post pairs.

use std::error::Error as StdError;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::{error, info};

use crate::error::NotifyError;
use crate::types::{Notification, NotificationKind, Post, ReportType, User};

type BoxError = Box<dyn StdError + Send + Sync>;

/// Resolves post owners. Backed by the user store in production, by an
/// in-memory map in tests.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// `Ok(None)` means the user does not exist; `Err` means the directory
    /// itself failed to answer.
    async fn find_user(&self, user_id: i64) -> Result<Option<User>, BoxError>;
}

/// Persists notification records. `insert_pair` hands both records over in
/// one call so a transactional backend can commit them as a unit.
#[async_trait]
pub trait NotificationStore: Send + Sync {
    async fn insert_pair(
        &self,
        first: &Notification,
        second: &Notification,
    ) -> Result<(), BoxError>;
}

/// Builds and persists the two notifications produced by a match.
pub struct Notifier {
    directory: Arc<dyn UserDirectory>,
    store: Arc<dyn NotificationStore>,
}

impl Notifier {
    pub fn new(directory: Arc<dyn UserDirectory>, store: Arc<dyn NotificationStore>) -> Self {
        Self { directory, store }
    }

    /// Create the notification pair for a matched `(post, matched)` pair.
    ///
    /// Returns `Ok(None)` without touching the store when either owner
    /// cannot be resolved — a one-sided notification is never created.
    /// Store and directory failures are fatal and left to the caller's
    /// retry/compensation policy.
    pub async fn notify_match(
        &self,
        post: &Post,
        matched: &Post,
        similarity_score: f32,
    ) -> Result<Option<(Notification, Notification)>, NotifyError> {
        let post_owner = self
            .directory
            .find_user(post.user_id)
            .await
            .map_err(|e| NotifyError::Directory(e.to_string()))?;
        let matched_owner = self
            .directory
            .find_user(matched.user_id)
            .await
            .map_err(|e| NotifyError::Directory(e.to_string()))?;

        let (post_owner, matched_owner) = match (post_owner, matched_owner) {
            (Some(a), Some(b)) => (a, b),
            _ => {
                error!(
                    post_id = post.id,
                    matched_post_id = matched.id,
                    "user not found for match notification"
                );
                return Ok(None);
            }
        };

        // Truncated once from the shared score so both messages carry the
        // same percentage.
        let percent = (similarity_score * 100.0) as u32;

        let first = build_notification(post_owner.id, post, matched, percent);
        let second = build_notification(matched_owner.id, matched, post, percent);

        self.store
            .insert_pair(&first, &second)
            .await
            .map_err(|e| NotifyError::Store(e.to_string()))?;

        info!(
            user_a = post_owner.id,
            user_b = matched_owner.id,
            percent,
            "created match notifications"
        );
        Ok(Some((first, second)))
    }
}

/// Template keyed by the receiving post's report type. `related_post_id`
/// points at the *other* post so the pair cross-references itself.
fn build_notification(user_id: i64, own: &Post, other: &Post, percent: u32) -> Notification {
    let (title, message, kind) = match own.report_type {
        ReportType::Lost => (
            "Potential match for your lost item".to_string(),
            format!(
                "We found a potential match for your lost item '{}'. Someone reported \
                 finding a '{}' with {}% similarity.",
                own.item_name, other.item_name, percent
            ),
            NotificationKind::MatchLost,
        ),
        ReportType::Found => (
            "Potential match for your found item".to_string(),
            format!(
                "We found a potential match for your found item '{}'. Someone reported \
                 losing a '{}' with {}% similarity.",
                own.item_name, other.item_name, percent
            ),
            NotificationKind::MatchFound,
        ),
    };

    Notification {
        user_id,
        title,
        message,
        kind,
        is_read: false,
        created_at: Utc::now(),
        related_post_id: Some(other.id),
    }
}
