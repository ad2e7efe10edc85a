use pinlink_core::StorageError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum ResolveError {
    #[error("storage backend unavailable: {0}")]
    BackendUnavailable(#[from] StorageError),
}

impl ResolveError {
    pub fn http_status(&self) -> u16 {
        503
    }
}
