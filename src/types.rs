use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Classification of a report: an item that went missing or one that was
/// recovered. Stored lowercase on the wire; parsing trims and lowercases so
/// `" Lost "` and `"lost"` land on the same variant.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ReportType {
    Lost,
    Found,
}

impl ReportType {
    /// Parse a raw report-type string. Whitespace is trimmed and the
    /// comparison is case-insensitive; anything else is `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "lost" => Some(ReportType::Lost),
            "found" => Some(ReportType::Found),
            _ => None,
        }
    }

    /// The type a candidate must have to be matchable against this one.
    pub fn opposite(self) -> Self {
        match self {
            ReportType::Lost => ReportType::Found,
            ReportType::Found => ReportType::Lost,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ReportType::Lost => "lost",
            ReportType::Found => "found",
        }
    }
}

impl fmt::Display for ReportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A lost-or-found item report as the matching engine sees it.
///
/// The persistence layer owns the full record (location, contact details,
/// images); the engine only reads the fields that feed the embedder and the
/// notification templates.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Post {
    pub id: i64,
    pub user_id: i64,
    pub report_type: ReportType,
    pub item_name: String,
    pub description: String,
}

impl Post {
    /// Text fed to the embedder: item name and description joined by a
    /// single space, the same concatenation for every caller so cached
    /// vectors stay comparable.
    pub fn embed_text(&self) -> String {
        format!("{} {}", self.item_name, self.description)
    }
}

/// Embedding output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Embedding {
    /// Final embedding values.
    pub vector: Vec<f32>,
    /// Name of the model that produced the vector.
    pub model_name: String,
    /// Dimension of `vector`.
    pub dim: usize,
    /// Whether [`vector`](Self::vector) was L2-normalized.
    pub normalized: bool,
}

/// A candidate post together with its similarity to the query post.
/// Transient: produced by the engine, consumed by the notifier, never stored.
#[derive(Debug, Clone, PartialEq)]
pub struct Match {
    pub post: Post,
    pub score: f32,
}

/// Notification category. The engine only emits the two `Match*` kinds; the
/// rest exist so collaborators can round-trip records they own.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    MatchLost,
    MatchFound,
    Message,
    System,
    Welcome,
}

impl NotificationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            NotificationKind::MatchLost => "match_lost",
            NotificationKind::MatchFound => "match_found",
            NotificationKind::Message => "message",
            NotificationKind::System => "system",
            NotificationKind::Welcome => "welcome",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A notification record handed to the persistence collaborator.
/// Immutable after creation except for `is_read`, which the consumer toggles.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Notification {
    pub user_id: i64,
    pub title: String,
    pub message: String,
    pub kind: NotificationKind,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
    /// The other post in the matched pair. Weak reference: the store may
    /// null it out when that post is deleted.
    pub related_post_id: Option<i64>,
}

/// Owner of a post, as resolved by the user directory collaborator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_type_parse_normalizes() {
        assert_eq!(ReportType::parse("lost"), Some(ReportType::Lost));
        assert_eq!(ReportType::parse(" FOUND "), Some(ReportType::Found));
        assert_eq!(ReportType::parse("Lost\n"), Some(ReportType::Lost));
        assert_eq!(ReportType::parse("stolen"), None);
        assert_eq!(ReportType::parse(""), None);
    }

    #[test]
    fn report_type_opposite_flips() {
        assert_eq!(ReportType::Lost.opposite(), ReportType::Found);
        assert_eq!(ReportType::Found.opposite(), ReportType::Lost);
    }

    #[test]
    fn report_type_serde_lowercase() {
        let json = serde_json::to_string(&ReportType::Lost).unwrap();
        assert_eq!(json, "\"lost\"");
        let parsed: ReportType = serde_json::from_str("\"found\"").unwrap();
        assert_eq!(parsed, ReportType::Found);
    }

    #[test]
    fn notification_kind_serde_snake_case() {
        let json = serde_json::to_string(&NotificationKind::MatchLost).unwrap();
        assert_eq!(json, "\"match_lost\"");
        let parsed: NotificationKind = serde_json::from_str("\"match_found\"").unwrap();
        assert_eq!(parsed, NotificationKind::MatchFound);
    }

    #[test]
    fn embed_text_joins_with_single_space() {
        let post = Post {
            id: 1,
            user_id: 9,
            report_type: ReportType::Lost,
            item_name: "black wallet".into(),
            description: "leather, found near library".into(),
        };
        assert_eq!(post.embed_text(), "black wallet leather, found near library");
    }

    #[test]
    fn post_serde_roundtrip() {
        let post = Post {
            id: 7,
            user_id: 3,
            report_type: ReportType::Found,
            item_name: "umbrella".into(),
            description: "blue, left at cafeteria".into(),
        };
        let serialized = serde_json::to_string(&post).unwrap();
        let deserialized: Post = serde_json::from_str(&serialized).unwrap();
        assert_eq!(post, deserialized);
    }
}
