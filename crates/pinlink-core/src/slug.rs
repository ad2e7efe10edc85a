use crate::error::CoreError;
use crate::validate::{is_reserved, is_slug_syntax, MAX_SLUG_LENGTH, MIN_SLUG_LENGTH};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// A short identifier mapping to a target URL.
///
/// Slugs are 3-64 characters long and contain only alphanumeric
/// characters, hyphens, or underscores. Values constructed through
/// [`Slug::parse`] are additionally guaranteed not to be reserved.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Slug(String);

impl Slug {
    /// Parses a user-provided slug, enforcing syntax and reserved words.
    pub fn parse(candidate: impl Into<String>) -> Result<Self, CoreError> {
        let slug = Self::parse_syntax(candidate)?;
        if is_reserved(&slug.0) {
            return Err(CoreError::ReservedSlug(slug.0));
        }
        Ok(slug)
    }

    /// Parses a slug checking only the syntax rule.
    ///
    /// Used when re-reading stored records, where the reservation list may
    /// have changed since the record was written.
    pub fn parse_syntax(candidate: impl Into<String>) -> Result<Self, CoreError> {
        let candidate = candidate.into();
        if !is_slug_syntax(&candidate) {
            return Err(CoreError::InvalidSlug(format!(
                "must be {MIN_SLUG_LENGTH}-{MAX_SLUG_LENGTH} characters of [A-Za-z0-9_-]: '{candidate}'"
            )));
        }
        Ok(Self(candidate))
    }

    /// Creates a `Slug` without validation.
    ///
    /// Use this only for slugs produced by trusted internal sources
    /// (e.g. generators drawing from the slug alphabet).
    pub fn new_unchecked(slug: impl Into<String>) -> Self {
        Self(slug.into())
    }

    /// Builds the full short URL under the given base URL.
    pub fn to_url(&self, base_url: &str) -> String {
        format!("{}/{}", base_url.trim_end_matches('/'), self.0)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl Display for Slug {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Slug {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
