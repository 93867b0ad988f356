//! Location ingestion and query service
//!
//! Submitting a location is two sequential fallible steps: store, then
//! notify. A notification failure does not remove the stored record, and
//! neither step is retried. Callers seeing a failed submission must list
//! the history to learn whether the record was kept.

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{error, info, instrument};

use crate::metrics::ServiceMetrics;
use crate::model::{LocationRecord, ShareLocationRequest, HISTORY_LIMIT};
use crate::notifier::{LocationNotifier, NotifierError};
use crate::store::{LocationStore, StoreError, StoreResult};
use crate::{Error, Result};

/// Per-call bounds on the two collaborators
#[derive(Debug, Clone, Copy)]
pub struct Timeouts {
    pub store: Duration,
    pub notify: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            store: Duration::from_secs(5),
            notify: Duration::from_secs(10),
        }
    }
}

#[derive(Clone)]
pub struct LocationService {
    store: Arc<dyn LocationStore>,
    notifier: Arc<dyn LocationNotifier>,
    timeouts: Timeouts,
    metrics: ServiceMetrics,
}

impl LocationService {
    pub fn new(
        store: Arc<dyn LocationStore>,
        notifier: Arc<dyn LocationNotifier>,
        timeouts: Timeouts,
    ) -> Self {
        Self {
            store,
            notifier,
            timeouts,
            metrics: ServiceMetrics::new(),
        }
    }

    /// Validate, store, then push to the notification sink
    #[instrument(skip(self, request))]
    pub async fn share_location(&self, request: ShareLocationRequest) -> Result<LocationRecord> {
        request.validate()?;
        let record = LocationRecord::new(request);

        self.bounded_store(self.store.insert(&record)).await?;
        info!(id = %record.id, "Location stored");

        let started = Instant::now();
        let outcome = match tokio::time::timeout(
            self.timeouts.notify,
            self.notifier.notify(&record.coordinates()),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(NotifierError::Timeout(self.timeouts.notify)),
        };
        self.metrics
            .notify_latency_ms
            .record(started.elapsed().as_secs_f64() * 1000.0);

        if let Err(e) = outcome {
            self.metrics.notification_failures.inc();
            error!(
                id = %record.id,
                sink = self.notifier.sink(),
                error = %e,
                "Failed to forward location; record remains stored"
            );
            return Err(Error::Notification(e));
        }

        self.metrics.notifications_sent.inc();
        self.metrics.locations_shared.inc();
        info!(id = %record.id, sink = self.notifier.sink(), "Location forwarded");

        Ok(record)
    }

    /// The most recent records, newest first, capped at `HISTORY_LIMIT`
    pub async fn list_locations(&self) -> Result<Vec<LocationRecord>> {
        self.bounded_store(self.store.list_recent(HISTORY_LIMIT)).await
    }

    /// Delete the whole history; returns the number of records removed
    pub async fn clear_locations(&self) -> Result<u64> {
        let deleted = self.bounded_store(self.store.clear()).await?;
        self.metrics.locations_cleared.add(deleted);
        info!(deleted_count = deleted, "Location history cleared");
        Ok(deleted)
    }

    pub async fn store_healthy(&self) -> bool {
        tokio::time::timeout(self.timeouts.store, self.store.is_healthy())
            .await
            .unwrap_or(false)
    }

    pub fn store_backend(&self) -> &'static str {
        self.store.backend()
    }

    pub fn notifier_configured(&self) -> bool {
        self.notifier.is_configured()
    }

    pub fn metrics(&self) -> &ServiceMetrics {
        &self.metrics
    }

    pub fn close(&self) {
        self.store.close();
    }

    async fn bounded_store<T>(&self, call: impl Future<Output = StoreResult<T>>) -> Result<T> {
        let result = match tokio::time::timeout(self.timeouts.store, call).await {
            Ok(result) => result,
            Err(_) => Err(StoreError::Timeout(self.timeouts.store)),
        };

        result.map_err(|e| {
            self.metrics.storage_failures.inc();
            error!(backend = self.store.backend(), error = %e, "Location store call failed");
            Error::Storage(e)
        })
    }
}
