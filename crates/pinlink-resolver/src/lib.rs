//! Redirect resolution for short links.
//!
//! [`RedirectResolver`] turns a slug into a [`ResolveOutcome`] and records
//! the visit on a detached task, so redirect latency never depends on the
//! counter write.
//!
//! ```rust,no_run
//! use pinlink_resolver::{RedirectResolver, ResolveOutcome, Resolver};
//! use pinlink_storage::RedisLinkStore;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = RedisLinkStore::connect("redis://127.0.0.1:6379").await?;
//! let resolver = RedirectResolver::new(store);
//!
//! match resolver.resolve("abc1234").await? {
//!     ResolveOutcome::Redirect(url) => println!("301 -> {url}"),
//!     ResolveOutcome::Expired => println!("410"),
//!     ResolveOutcome::NotFound => println!("404"),
//! }
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod outcome;
pub mod service;

pub use error::ResolveError;
pub use outcome::{ResolveOutcome, REDIRECT_CACHE_CONTROL};
pub use service::{RedirectResolver, Resolver};

pub type Result<T> = std::result::Result<T, ResolveError>;
