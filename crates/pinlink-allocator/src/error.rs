use pinlink_core::{CoreError, StorageError};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AllocateError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("invalid slug: {0}")]
    InvalidSlug(String),
    #[error("slug already exists: {0}")]
    SlugConflict(String),
    #[error("no free slug after {attempts} attempts")]
    AllocationExhausted { attempts: usize },
    #[error("storage backend unavailable: {0}")]
    BackendUnavailable(String),
}

impl AllocateError {
    /// HTTP status an entry point should answer with.
    pub fn http_status(&self) -> u16 {
        match self {
            Self::InvalidUrl(_) | Self::InvalidSlug(_) => 400,
            Self::SlugConflict(_) | Self::AllocationExhausted { .. } => 409,
            Self::BackendUnavailable(_) => 503,
        }
    }

    /// Machine-readable reason for the failure.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::InvalidUrl(_) => "invalid_url",
            Self::InvalidSlug(_) => "invalid_slug",
            Self::SlugConflict(_) => "slug_conflict",
            Self::AllocationExhausted { .. } => "allocation_exhausted",
            Self::BackendUnavailable(_) => "backend_unavailable",
        }
    }
}

impl From<CoreError> for AllocateError {
    fn from(value: CoreError) -> Self {
        match value {
            CoreError::InvalidSlug(message) => Self::InvalidSlug(message),
            CoreError::ReservedSlug(slug) => Self::InvalidSlug(format!("'{slug}' is reserved")),
        }
    }
}

impl From<StorageError> for AllocateError {
    fn from(value: StorageError) -> Self {
        Self::BackendUnavailable(value.to_string())
    }
}
