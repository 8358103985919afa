use thiserror::Error;

/// Errors surfaced while turning text into a vector.
///
/// These are data-quality errors from the engine's point of view: the cache
/// and matcher recover locally by skipping the affected post, they never
/// abort a matching pass over one of these.
#[derive(Debug, Error, Clone)]
pub enum EmbedError {
    /// Configuration is inconsistent (e.g., api mode without an api_url).
    #[error("invalid embed config: {0}")]
    InvalidConfig(String),
    /// The remote embedding endpoint failed (transport, status, or shape).
    #[error("embedding api failure: {0}")]
    Api(String),
    /// The model produced no usable output for this text.
    #[error("inference failure: {0}")]
    Inference(String),
}

/// Errors raised by the notifier. Both variants are systemic: the caller
/// decides on retry or compensation. "User not found" is not here — that
/// path returns `Ok(None)` and creates no one-sided notification.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// The user directory collaborator failed to answer.
    #[error("user directory error: {0}")]
    Directory(String),
    /// Persisting the notification pair failed.
    #[error("notification store error: {0}")]
    Store(String),
}

/// Errors produced by the matching layer. Missing embeddings and empty
/// candidate pools are not errors — they degrade to fewer or zero matches.
#[derive(Debug, Error)]
pub enum MatchError {
    /// Invalid engine configuration.
    #[error("invalid match config: {0}")]
    InvalidConfig(String),
    /// The collaborator failed to supply the candidate pool. Fatal for the
    /// matching pass.
    #[error("candidate pool unavailable: {0}")]
    CandidatePool(String),
    /// Notification creation failed after a match was found.
    #[error("notify error: {0}")]
    Notify(#[from] NotifyError),
}
