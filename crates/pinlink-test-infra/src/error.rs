use thiserror::Error;

/// Failures while bringing up a backing service for tests.
#[derive(Debug, Error)]
pub enum TestInfraError {
    #[error("container error: {0}")]
    Container(#[from] testcontainers::TestcontainersError),

    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("mysql error: {0}")]
    MySql(#[from] sqlx::Error),
}

pub type Result<T> = std::result::Result<T, TestInfraError>;
