//! Location Share Microservice
//!
//! Accepts GPS coordinates from clients, persists each as an immutable
//! record, forwards the coordinates to a Telegram chat, and serves the
//! newest-first history and a full-clear operation.

use std::time::Instant;

pub mod app;
pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod model;
pub mod notifier;
pub mod routes;
pub mod service;
pub mod store;

pub use app::LocationShareApp;
pub use config::Config;
pub use error::{Error, Result};
pub use model::{LocationRecord, ShareLocationRequest};
pub use routes::create_router;
pub use service::{LocationService, Timeouts};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub service: LocationService,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(service: LocationService) -> Self {
        Self {
            service,
            started_at: Instant::now(),
        }
    }
}
