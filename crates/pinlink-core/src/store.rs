use crate::error::StorageError;
use crate::record::{CreateOutcome, LinkRecord};
use crate::slug::Slug;
use async_trait::async_trait;
use jiff::Timestamp;
use std::sync::Arc;

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Durable storage of link records.
///
/// Every implementation must make [`try_create`](LinkStore::try_create)
/// atomic with respect to other processes using the same backend. An
/// in-process lock does not count: independent instances may race on the
/// same slug.
#[async_trait]
pub trait LinkStore: Send + Sync + 'static {
    /// Persists a fresh record for `slug` unless one already exists.
    ///
    /// A uniqueness collision is reported as [`CreateOutcome::AlreadyExists`],
    /// never as an error.
    async fn try_create(&self, slug: &Slug, target_url: &str) -> Result<CreateOutcome>;

    /// Retrieves the record for `slug`, including expired ones.
    async fn fetch(&self, slug: &Slug) -> Result<Option<LinkRecord>>;

    /// Adds exactly one visit to `slug`. Absent slugs are left untouched.
    async fn increment_visits(&self, slug: &Slug) -> Result<()>;

    /// Lists pinned records that have not expired, ordered by slug.
    async fn list_pinned_active(&self) -> Result<Vec<LinkRecord>>;
}

/// Administrative mutations that sit outside the request path.
#[async_trait]
pub trait LinkAdmin: LinkStore {
    /// Marks or unmarks `slug` for static export.
    /// Returns `false` if the slug does not exist.
    async fn set_pinned(&self, slug: &Slug, pinned: bool) -> Result<bool>;

    /// Sets or clears the expiration of `slug`.
    /// Returns `false` if the slug does not exist.
    async fn set_expiration(&self, slug: &Slug, expires_at: Option<Timestamp>) -> Result<bool>;
}

#[async_trait]
impl<S: LinkStore + ?Sized> LinkStore for Arc<S> {
    async fn try_create(&self, slug: &Slug, target_url: &str) -> Result<CreateOutcome> {
        (**self).try_create(slug, target_url).await
    }

    async fn fetch(&self, slug: &Slug) -> Result<Option<LinkRecord>> {
        (**self).fetch(slug).await
    }

    async fn increment_visits(&self, slug: &Slug) -> Result<()> {
        (**self).increment_visits(slug).await
    }

    async fn list_pinned_active(&self) -> Result<Vec<LinkRecord>> {
        (**self).list_pinned_active().await
    }
}

#[async_trait]
impl<S: LinkAdmin + ?Sized> LinkAdmin for Arc<S> {
    async fn set_pinned(&self, slug: &Slug, pinned: bool) -> Result<bool> {
        (**self).set_pinned(slug, pinned).await
    }

    async fn set_expiration(&self, slug: &Slug, expires_at: Option<Timestamp>) -> Result<bool> {
        (**self).set_expiration(slug, expires_at).await
    }
}
