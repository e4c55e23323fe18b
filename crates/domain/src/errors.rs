use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum DomainError {
    #[error("Invalid game record: {0}")]
    InvalidRecord(String),

    #[error("Invalid category: {0}")]
    InvalidCategory(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Retention run failed: {0}")]
    RetentionFailed(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}
