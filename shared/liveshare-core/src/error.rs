//! Error types for liveshare services

use thiserror::Error;

pub type Result<T> = std::result::Result<T, LiveshareError>;

/// Startup and runtime failures outside request handling
#[derive(Error, Debug)]
pub enum LiveshareError {
    /// Environment variable missing or unparseable
    #[error("Configuration error: {0}")]
    Config(String),

    /// Listener bind, signal registration and other socket-level failures
    #[error("Network error: {0}")]
    Network(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<std::io::Error> for LiveshareError {
    fn from(err: std::io::Error) -> Self {
        LiveshareError::Network(err.to_string())
    }
}
