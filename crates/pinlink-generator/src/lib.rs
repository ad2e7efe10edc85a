pub mod random;

pub use random::RandomGenerator;

use pinlink_core::Slug;

/// Trait for generating candidate slugs.
///
/// Implementations are pure generators that don't interact with storage;
/// collisions are detected by the store and retried by the allocator.
pub trait Generator: Send + Sync + 'static {
    fn generate(&self) -> Slug;
}
