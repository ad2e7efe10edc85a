use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("invalid slug: {0}")]
    InvalidSlug(String),
    #[error("slug is reserved: {0}")]
    ReservedSlug(String),
}

/// Errors raised by [`LinkStore`](crate::LinkStore) backends.
///
/// Uniqueness violations are not errors: they are reported as
/// [`CreateOutcome::AlreadyExists`](crate::CreateOutcome::AlreadyExists).
#[derive(Debug, Clone, Error)]
pub enum StorageError {
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
    #[error("storage operation timed out: {0}")]
    Timeout(String),
    #[error("storage query failed: {0}")]
    Query(String),
    #[error("stored data is invalid: {0}")]
    InvalidData(String),
}
