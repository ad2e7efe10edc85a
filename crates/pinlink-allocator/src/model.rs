use pinlink_core::Slug;
use serde::{Deserialize, Serialize};

/// A request to shorten `url`, optionally under a caller-chosen slug.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateLinkRequest {
    pub url: String,
    #[serde(default)]
    pub slug: Option<String>,
}

impl CreateLinkRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            slug: None,
        }
    }

    pub fn with_slug(url: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            slug: Some(slug.into()),
        }
    }
}

/// A successfully persisted link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Allocation {
    pub slug: Slug,
    pub short_url: String,
    pub url: String,
}
