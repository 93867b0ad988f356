//! Service metrics

use liveshare_telemetry::{Counter, Histogram, HistogramSnapshot};
use serde::Serialize;

#[derive(Clone)]
pub struct ServiceMetrics {
    pub locations_shared: Counter,
    pub notifications_sent: Counter,
    pub notification_failures: Counter,
    pub storage_failures: Counter,
    pub locations_cleared: Counter,
    pub notify_latency_ms: Histogram,
}

#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub locations_shared: u64,
    pub notifications_sent: u64,
    pub notification_failures: u64,
    pub storage_failures: u64,
    pub locations_cleared: u64,
    pub notify_latency_ms: HistogramSnapshot,
}

impl ServiceMetrics {
    pub fn new() -> Self {
        Self {
            locations_shared: Counter::new(),
            notifications_sent: Counter::new(),
            notification_failures: Counter::new(),
            storage_failures: Counter::new(),
            locations_cleared: Counter::new(),
            notify_latency_ms: Histogram::with_capacity(1000),
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            locations_shared: self.locations_shared.get(),
            notifications_sent: self.notifications_sent.get(),
            notification_failures: self.notification_failures.get(),
            storage_failures: self.storage_failures.get(),
            locations_cleared: self.locations_cleared.get(),
            notify_latency_ms: self.notify_latency_ms.snapshot(),
        }
    }
}

impl Default for ServiceMetrics {
    fn default() -> Self {
        Self::new()
    }
}
