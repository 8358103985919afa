//! In-memory collaborator backends.
//!
//! Ephemeral realizations of [`UserDirectory`], [`NotificationStore`], and
//! [`CandidateSource`] for embedding consumers and tests. State lives for
//! the process lifetime and is shard-locked for concurrent access.

use std::error::Error as StdError;
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;

use crate::engine::CandidateSource;
use crate::notify::{NotificationStore, UserDirectory};
use crate::types::{Notification, Post, ReportType, User};

type BoxError = Box<dyn StdError + Send + Sync>;

/// User directory over a plain map.
#[derive(Default)]
pub struct InMemoryUserDirectory {
    users: DashMap<i64, User>,
}

impl InMemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, user: User) {
        self.users.insert(user.id, user);
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn find_user(&self, user_id: i64) -> Result<Option<User>, BoxError> {
        Ok(self.users.get(&user_id).map(|u| u.clone()))
    }
}

/// Notification store that appends pairs to a shared vector. The pair goes
/// in under one lock acquisition, which is as transactional as in-memory
/// gets.
#[derive(Default)]
pub struct InMemoryNotificationStore {
    notifications: std::sync::Mutex<Vec<Notification>>,
}

impl InMemoryNotificationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn all(&self) -> Vec<Notification> {
        self.notifications.lock().expect("store lock poisoned").clone()
    }

    pub fn count(&self) -> usize {
        self.notifications.lock().expect("store lock poisoned").len()
    }
}

#[async_trait]
impl NotificationStore for InMemoryNotificationStore {
    async fn insert_pair(
        &self,
        first: &Notification,
        second: &Notification,
    ) -> Result<(), BoxError> {
        let mut guard = self.notifications.lock().expect("store lock poisoned");
        guard.push(first.clone());
        guard.push(second.clone());
        Ok(())
    }
}

/// Candidate source over a post list, filtering by report type in insertion
/// order — the order the engine's tie-break depends on.
#[derive(Default)]
pub struct InMemoryPostStore {
    posts: std::sync::Mutex<Vec<Post>>,
}

impl InMemoryPostStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_posts(posts: Vec<Post>) -> Self {
        Self {
            posts: std::sync::Mutex::new(posts),
        }
    }

    pub fn insert(&self, post: Post) {
        self.posts.lock().expect("post lock poisoned").push(post);
    }
}

#[async_trait]
impl CandidateSource for InMemoryPostStore {
    async fn posts_of_type(&self, report_type: ReportType) -> Result<Vec<Post>, BoxError> {
        let guard = self.posts.lock().expect("post lock poisoned");
        Ok(guard
            .iter()
            .filter(|p| p.report_type == report_type)
            .cloned()
            .collect())
    }
}

/// Convenience bundle for wiring an ephemeral deployment.
pub fn in_memory_collaborators() -> (
    Arc<InMemoryPostStore>,
    Arc<InMemoryUserDirectory>,
    Arc<InMemoryNotificationStore>,
) {
    (
        Arc::new(InMemoryPostStore::new()),
        Arc::new(InMemoryUserDirectory::new()),
        Arc::new(InMemoryNotificationStore::new()),
    )
}
