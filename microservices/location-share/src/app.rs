//! Service lifecycle wiring

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use liveshare_core::{LiveshareService, Result};
use tracing::info;

use crate::config::{Config, SERVICE_ID};
use crate::routes::create_router;
use crate::service::LocationService;
use crate::AppState;

pub struct LocationShareApp {
    config: Config,
    service: LocationService,
    start_time: Instant,
    closed: AtomicBool,
}

impl LocationShareApp {
    pub fn new(config: Config, service: LocationService) -> Self {
        Self {
            config,
            service,
            start_time: Instant::now(),
            closed: AtomicBool::new(false),
        }
    }

    pub fn state(&self) -> AppState {
        AppState {
            service: self.service.clone(),
            started_at: self.start_time,
        }
    }

    pub fn router(&self) -> axum::Router {
        create_router(self.state(), &self.config.cors_origins)
    }
}

#[async_trait::async_trait]
impl LiveshareService for LocationShareApp {
    fn service_id(&self) -> &'static str {
        SERVICE_ID
    }

    async fn shutdown(&self) -> Result<()> {
        if self.closed.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        info!("Shutting down Location Share");
        self.service.close();
        Ok(())
    }

    async fn start(&self) -> Result<()> {
        let bind = self.config.service.http_bind;
        info!(bind = %bind, "Starting Location Share HTTP server");

        let listener = tokio::net::TcpListener::bind(bind).await?;
        axum::serve(listener, self.router()).await?;

        Ok(())
    }
}
