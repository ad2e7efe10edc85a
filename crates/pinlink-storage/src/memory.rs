use crate::{now_millis, truncate_to_millis, CreateOutcome, LinkAdmin, LinkRecord, LinkStore, Result};
use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use jiff::Timestamp;
use pinlink_core::Slug;
use tracing::trace;

/// In-memory implementation of [`LinkStore`] using DashMap.
///
/// Creation goes through the map's entry API, which holds the shard lock
/// across the existence check and the insert. The guarantee only covers a
/// single process.
#[derive(Debug, Default)]
pub struct InMemoryLinkStore {
    storage: DashMap<Slug, LinkRecord>,
}

impl InMemoryLinkStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new in-memory store with the specified capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            storage: DashMap::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.storage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }
}

#[async_trait]
impl LinkStore for InMemoryLinkStore {
    async fn try_create(&self, slug: &Slug, target_url: &str) -> Result<CreateOutcome> {
        match self.storage.entry(slug.clone()) {
            Entry::Occupied(_) => {
                trace!(slug = %slug, "slug already taken");
                Ok(CreateOutcome::AlreadyExists)
            }
            Entry::Vacant(vacant) => {
                let record = LinkRecord::new(slug.clone(), target_url, now_millis());
                vacant.insert(record.clone());
                Ok(CreateOutcome::Created(record))
            }
        }
    }

    async fn fetch(&self, slug: &Slug) -> Result<Option<LinkRecord>> {
        Ok(self.storage.get(slug).map(|entry| entry.value().clone()))
    }

    async fn increment_visits(&self, slug: &Slug) -> Result<()> {
        if let Some(mut entry) = self.storage.get_mut(slug) {
            entry.visit_count = entry.visit_count.saturating_add(1);
        }
        Ok(())
    }

    async fn list_pinned_active(&self) -> Result<Vec<LinkRecord>> {
        let now = Timestamp::now();
        let mut records: Vec<LinkRecord> = self
            .storage
            .iter()
            .filter(|entry| entry.pinned && !entry.is_expired_at(now))
            .map(|entry| entry.value().clone())
            .collect();
        records.sort_by(|a, b| a.slug.cmp(&b.slug));
        Ok(records)
    }
}

#[async_trait]
impl LinkAdmin for InMemoryLinkStore {
    async fn set_pinned(&self, slug: &Slug, pinned: bool) -> Result<bool> {
        let Some(mut entry) = self.storage.get_mut(slug) else {
            return Ok(false);
        };
        entry.pinned = pinned;
        Ok(true)
    }

    async fn set_expiration(&self, slug: &Slug, expires_at: Option<Timestamp>) -> Result<bool> {
        let Some(mut entry) = self.storage.get_mut(slug) else {
            return Ok(false);
        };
        entry.expires_at = expires_at.map(truncate_to_millis);
        Ok(true)
    }
}
