//! Location Share service binary

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use liveshare_core::MicroserviceRuntime;
use location_share::config::{Config, StoreBackend, SERVICE_ID};
use location_share::notifier::{LocationNotifier, TelegramNotifier};
use location_share::store::{DocumentLocationStore, InMemoryLocationStore, LocationStore};
use location_share::{LocationService, LocationShareApp};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    liveshare_telemetry::init(SERVICE_ID)?;

    info!("Starting Location Share microservice");

    let config = Config::from_env()?;
    info!(
        bind = %config.service.http_bind,
        store = ?config.store_backend,
        collection = %config.collection,
        cors_origins = ?config.cors_origins,
        "Configuration loaded"
    );

    let store = open_store(&config).await?;

    let notifier = TelegramNotifier::new(config.telegram.clone())
        .context("Failed to build Telegram client")?;
    if !notifier.is_configured() {
        warn!("Telegram credentials missing; every location submission will report a notification failure");
    }

    let service = LocationService::new(store, Arc::new(notifier), config.timeouts);
    let app = Arc::new(LocationShareApp::new(config.clone(), service));

    MicroserviceRuntime::with_config(config.service.clone())
        .run_service(app)
        .await?;

    Ok(())
}

/// Open the configured store, retrying while the database comes up
async fn open_store(config: &Config) -> anyhow::Result<Arc<dyn LocationStore>> {
    const MAX_RETRIES: u32 = 5;
    const RETRY_DELAY: Duration = Duration::from_secs(2);

    if config.store_backend == StoreBackend::Memory {
        warn!("Using in-memory location store; history is lost on restart");
        return Ok(Arc::new(InMemoryLocationStore::new()));
    }

    let mut retries = 0;
    loop {
        match DocumentLocationStore::connect(config.docstore.clone(), &config.collection).await {
            Ok(store) => return Ok(Arc::new(store)),
            Err(e) if retries < MAX_RETRIES => {
                retries += 1;
                warn!(attempt = retries, error = %e, "Location store not reachable, retrying");
                tokio::time::sleep(RETRY_DELAY).await;
            }
            Err(e) => return Err(e).context("Failed to open location store"),
        }
    }
}
