//! Link store backends.
//!
//! [`RedisLinkStore`] is the key-value backend, [`MySqlLinkStore`] the
//! relational one. [`InMemoryLinkStore`] serves tests and single-process
//! development.

pub mod memory;
pub mod mysql;
pub mod redis;

pub use memory::InMemoryLinkStore;
pub use mysql::MySqlLinkStore;
pub use self::redis::RedisLinkStore;

pub use pinlink_core::store::Result;
pub use pinlink_core::{CreateOutcome, LinkAdmin, LinkRecord, LinkStore, StorageError};

use jiff::Timestamp;

/// Current time truncated to the millisecond precision both backends persist.
pub(crate) fn now_millis() -> Timestamp {
    truncate_to_millis(Timestamp::now())
}

/// Drops sub-millisecond precision exactly as persisting epoch milliseconds does.
pub(crate) fn truncate_to_millis(ts: Timestamp) -> Timestamp {
    Timestamp::from_millisecond(ts.as_millisecond()).unwrap_or(ts)
}

pub(crate) fn timestamp_from_millis(millis: i64) -> Result<Timestamp> {
    Timestamp::from_millisecond(millis).map_err(|e| {
        StorageError::InvalidData(format!("invalid timestamp '{millis}': {e}"))
    })
}
