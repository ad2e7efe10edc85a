use crate::error::AllocateError;
use crate::model::{Allocation, CreateLinkRequest};
use async_trait::async_trait;
use pinlink_core::{validate_url, CreateOutcome, LinkStore, Slug};
use pinlink_generator::Generator;
use std::sync::Arc;
use tracing::{debug, warn};
use typed_builder::TypedBuilder;

type Result<T> = std::result::Result<T, AllocateError>;

/// Total attempts for a generated slug before giving up.
pub const MAX_SLUG_ATTEMPTS: usize = 3;

#[derive(Debug, Clone, TypedBuilder)]
pub struct AllocatorConfig {
    /// Public origin that short URLs are built on, e.g. `https://pin.link`.
    #[builder(setter(into))]
    pub base_url: String,
    #[builder(default = MAX_SLUG_ATTEMPTS)]
    pub max_attempts: usize,
}

#[async_trait]
pub trait Allocator: Send + Sync + 'static {
    /// Validates the request and persists a new link under a unique slug.
    async fn allocate(&self, request: CreateLinkRequest) -> Result<Allocation>;
}

/// Allocates slugs against a [`LinkStore`].
///
/// Custom slugs are tried exactly once. Generated slugs are retried on
/// collision up to [`AllocatorConfig::max_attempts`] times in total.
/// Uniqueness itself is enforced by the store.
pub struct LinkAllocator<S, G> {
    store: Arc<S>,
    generator: Arc<G>,
    config: Arc<AllocatorConfig>,
}

impl<S, G> Clone for LinkAllocator<S, G> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            generator: Arc::clone(&self.generator),
            config: Arc::clone(&self.config),
        }
    }
}

impl<S: LinkStore, G: Generator> LinkAllocator<S, G> {
    pub fn new(store: S, generator: G, config: AllocatorConfig) -> Self {
        Self {
            store: Arc::new(store),
            generator: Arc::new(generator),
            config: Arc::new(config),
        }
    }

    /// Returns a reference to the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    async fn create_custom(&self, slug: Slug, url: &str) -> Result<Slug> {
        match self.store.try_create(&slug, url).await? {
            CreateOutcome::Created(_) => Ok(slug),
            CreateOutcome::AlreadyExists => {
                debug!(slug = %slug, "custom slug already taken");
                Err(AllocateError::SlugConflict(slug.into_string()))
            }
        }
    }

    async fn create_generated(&self, url: &str) -> Result<Slug> {
        for attempt in 1..=self.config.max_attempts {
            let slug = self.generator.generate();
            match self.store.try_create(&slug, url).await? {
                CreateOutcome::Created(_) => return Ok(slug),
                CreateOutcome::AlreadyExists => {
                    warn!(slug = %slug, attempt, "generated slug collided");
                }
            }
        }
        Err(AllocateError::AllocationExhausted {
            attempts: self.config.max_attempts,
        })
    }
}

#[async_trait]
impl<S: LinkStore, G: Generator> Allocator for LinkAllocator<S, G> {
    async fn allocate(&self, request: CreateLinkRequest) -> Result<Allocation> {
        let CreateLinkRequest { url, slug } = request;

        if !validate_url(&url) {
            return Err(AllocateError::InvalidUrl(url));
        }

        let custom = match slug.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => Some(Slug::parse(raw)?),
            _ => None,
        };

        let slug = match custom {
            Some(slug) => self.create_custom(slug, &url).await?,
            None => self.create_generated(&url).await?,
        };

        debug!(slug = %slug, url = %url, "allocated link");
        Ok(Allocation {
            short_url: slug.to_url(&self.config.base_url),
            slug,
            url,
        })
    }
}
