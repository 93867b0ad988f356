//! Notification sink adapters
//!
//! A notifier pushes the coordinates of a freshly stored location to an
//! external messaging endpoint. One attempt per location, no retries.

pub mod telegram;

use std::time::Duration;

use async_trait::async_trait;

use crate::model::Coordinates;

/// Result of notifier operations
pub type NotifyResult<T> = Result<T, NotifierError>;

/// Notifier errors
#[derive(Debug, thiserror::Error)]
pub enum NotifierError {
    #[error("sink not configured: {0}")]
    NotConfigured(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error("rejected with status {status}: {body}")]
    Rejected { status: u16, body: String },
}

#[async_trait]
pub trait LocationNotifier: Send + Sync {
    /// Sink identifier for logs
    fn sink(&self) -> &'static str;

    /// Whether credentials/destination are present
    fn is_configured(&self) -> bool;

    /// Push one location; any non-success outcome is an error
    async fn notify(&self, coordinates: &Coordinates) -> NotifyResult<()>;
}

pub use telegram::{TelegramConfig, TelegramNotifier};
