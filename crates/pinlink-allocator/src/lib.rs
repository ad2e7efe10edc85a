//! Link allocation: turns a creation request into a persisted,
//! uniquely-slugged link record.

pub mod error;
pub mod model;
pub mod service;

pub use error::AllocateError;
pub use model::{Allocation, CreateLinkRequest};
pub use service::{Allocator, AllocatorConfig, LinkAllocator, MAX_SLUG_ATTEMPTS};
