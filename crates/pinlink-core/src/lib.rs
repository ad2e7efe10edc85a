//! Core types and traits for the pinlink short-link service.
//!
//! This crate provides the link record model, slug validation and the
//! [`LinkStore`] contract shared by the allocator, the resolver and the
//! snapshot exporter.

pub mod error;
pub mod record;
pub mod slug;
pub mod store;
pub mod validate;

pub use error::{CoreError, StorageError};
pub use record::{CreateOutcome, LinkRecord};
pub use slug::Slug;
pub use store::{LinkAdmin, LinkStore};
pub use validate::{validate_slug, validate_url};
