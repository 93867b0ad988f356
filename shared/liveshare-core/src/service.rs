//! Service infrastructure for all microservices

use async_trait::async_trait;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};

use crate::config::ServiceConfig;
use crate::error::{LiveshareError, Result};

/// Standard trait all microservices must implement
#[async_trait]
pub trait LiveshareService: Send + Sync + 'static {
    /// Service identifier (e.g., "location-share")
    fn service_id(&self) -> &'static str;

    /// Service version
    fn version(&self) -> &'static str {
        env!("CARGO_PKG_VERSION")
    }

    /// Graceful shutdown. Called exactly once by the runtime.
    async fn shutdown(&self) -> Result<()>;

    /// Start the service (HTTP server etc.). Runs until aborted.
    async fn start(&self) -> Result<()>;
}

/// Runs one service: serves until a shutdown signal arrives or the server
/// task ends on its own, then shuts the service down.
pub struct MicroserviceRuntime {
    config: ServiceConfig,
    start_time: std::time::Instant,
}

impl MicroserviceRuntime {
    pub fn with_config(config: ServiceConfig) -> Self {
        Self {
            config,
            start_time: std::time::Instant::now(),
        }
    }

    /// Run `service` to completion. `shutdown` is called exactly once on
    /// every exit path; a server failure is returned after it.
    pub async fn run_service<S: LiveshareService>(self, service: Arc<S>) -> Result<()> {
        self.run_until(service, shutdown_signal()).await
    }

    async fn run_until<S, F>(self, service: Arc<S>, stop: F) -> Result<()>
    where
        S: LiveshareService,
        F: std::future::Future<Output = Result<&'static str>>,
    {
        info!(
            service_name = %self.config.service_name,
            service_id = service.service_id(),
            version = service.version(),
            "Starting microservice"
        );

        let mut server = {
            let service = service.clone();
            tokio::spawn(async move { service.start().await })
        };

        let outcome = tokio::select! {
            joined = &mut server => match joined {
                Ok(Ok(())) => {
                    warn!("Server exited before a shutdown signal");
                    Ok(())
                }
                Ok(Err(e)) => {
                    error!(error = %e, "Server failed");
                    Err(e)
                }
                Err(e) => Err(LiveshareError::Internal(format!("server task: {}", e))),
            },
            received = stop => received.map(|signal| {
                info!(signal, "Shutdown signal received, gracefully stopping");
            }),
        };

        if let Err(e) = service.shutdown().await {
            warn!(error = %e, "Error during shutdown");
        }
        server.abort();

        info!(
            uptime_seconds = self.start_time.elapsed().as_secs(),
            "Microservice stopped"
        );

        outcome
    }
}

/// Resolves with the name of the first termination signal received
async fn shutdown_signal() -> Result<&'static str> {
    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())?
            .recv()
            .await;
        Ok::<_, LiveshareError>("SIGTERM")
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<Result<&'static str>>();

    tokio::select! {
        res = signal::ctrl_c() => res.map(|_| "SIGINT").map_err(LiveshareError::from),
        res = terminate => res,
    }
}
