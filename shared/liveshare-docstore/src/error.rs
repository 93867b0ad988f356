//! Document store error types

use thiserror::Error;

pub type Result<T> = std::result::Result<T, DocStoreError>;

#[derive(Debug, Error)]
pub enum DocStoreError {
    #[error("Query error: {0}")]
    Query(#[from] tokio_postgres::Error),

    #[error("Pool error: {0}")]
    Pool(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),
}
