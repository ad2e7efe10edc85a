use crate::outcome::ResolveOutcome;
use crate::Result;
use async_trait::async_trait;
use jiff::Timestamp;
use pinlink_core::{LinkStore, Slug};
use std::sync::Arc;
use tracing::{debug, trace, warn};

#[async_trait]
pub trait Resolver: Send + Sync + 'static {
    /// Resolves a raw slug from an incoming request.
    async fn resolve(&self, slug: &str) -> Result<ResolveOutcome>;
}

/// Resolves slugs against a [`LinkStore`].
///
/// A lookup that yields a redirect also schedules one visit increment on
/// the Tokio runtime. The increment is never awaited and its failures are
/// only logged.
#[derive(Debug)]
pub struct RedirectResolver<S> {
    store: Arc<S>,
}

impl<S> Clone for RedirectResolver<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: LinkStore> RedirectResolver<S> {
    pub fn new(store: S) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    /// Returns a reference to the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Resolves `slug` as of `now`.
    pub async fn resolve_at(&self, slug: &str, now: Timestamp) -> Result<ResolveOutcome> {
        // nothing that fails the syntax rule can have been stored
        let Ok(slug) = Slug::parse_syntax(slug) else {
            trace!(slug, "malformed slug");
            return Ok(ResolveOutcome::NotFound);
        };

        let Some(record) = self.store.fetch(&slug).await? else {
            trace!(slug = %slug, "slug not found");
            return Ok(ResolveOutcome::NotFound);
        };

        if record.is_expired_at(now) {
            debug!(slug = %slug, "link has expired");
            return Ok(ResolveOutcome::Expired);
        }

        self.record_visit(slug);
        debug!(slug = %record.slug, url = %record.target_url, "resolved slug");
        Ok(ResolveOutcome::Redirect(record.target_url))
    }

    fn record_visit(&self, slug: Slug) {
        let store = Arc::clone(&self.store);
        tokio::spawn(async move {
            if let Err(e) = store.increment_visits(&slug).await {
                warn!(slug = %slug, error = %e, "failed to record visit");
            }
        });
    }
}

#[async_trait]
impl<S: LinkStore> Resolver for RedirectResolver<S> {
    async fn resolve(&self, slug: &str) -> Result<ResolveOutcome> {
        self.resolve_at(slug, Timestamp::now()).await
    }
}
