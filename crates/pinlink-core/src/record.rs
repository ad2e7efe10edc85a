use crate::slug::Slug;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// A stored short link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkRecord {
    pub slug: Slug,
    /// The URL the slug redirects to.
    pub target_url: String,
    pub created_at: Timestamp,
    /// When the link lapses, if ever.
    pub expires_at: Option<Timestamp>,
    pub visit_count: u64,
    /// Whether the link is included in static snapshot exports.
    pub pinned: bool,
}

impl LinkRecord {
    /// Builds the record persisted by a fresh creation.
    pub fn new(slug: Slug, target_url: impl Into<String>, created_at: Timestamp) -> Self {
        Self {
            slug,
            target_url: target_url.into(),
            created_at,
            expires_at: None,
            visit_count: 0,
            pinned: false,
        }
    }

    /// A record is expired once `now` reaches `expires_at`.
    pub fn is_expired_at(&self, now: Timestamp) -> bool {
        self.expires_at.is_some_and(|expires_at| expires_at <= now)
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Timestamp::now())
    }
}

/// Result of an atomic create-if-absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateOutcome {
    Created(LinkRecord),
    AlreadyExists,
}
