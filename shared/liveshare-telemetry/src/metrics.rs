//! Metrics primitives

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;

/// Monotonic counter; clones share the same value
#[derive(Clone, Default)]
pub struct Counter {
    value: Arc<AtomicU64>,
}

impl Counter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inc(&self) {
        self.value.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add(&self, n: u64) {
        self.value.fetch_add(n, Ordering::Relaxed);
    }

    pub fn get(&self) -> u64 {
        self.value.load(Ordering::Relaxed)
    }
}

/// Sliding-window histogram over the most recent `max_samples` values
#[derive(Clone)]
pub struct Histogram {
    samples: Arc<Mutex<VecDeque<f64>>>,
    max_samples: usize,
}

#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct HistogramSnapshot {
    pub count: usize,
    pub mean: f64,
    pub p50: f64,
    pub p95: f64,
}

impl Histogram {
    pub fn with_capacity(max_samples: usize) -> Self {
        let max_samples = max_samples.max(1);
        Self {
            samples: Arc::new(Mutex::new(VecDeque::with_capacity(max_samples.min(1000)))),
            max_samples,
        }
    }

    pub fn record(&self, value: f64) {
        let mut samples = self.samples.lock();
        if samples.len() >= self.max_samples {
            samples.pop_front();
        }
        samples.push_back(value);
    }

    pub fn snapshot(&self) -> HistogramSnapshot {
        let mut sorted: Vec<f64> = self.samples.lock().iter().copied().collect();
        if sorted.is_empty() {
            return HistogramSnapshot::default();
        }
        sorted.sort_by(|a, b| a.total_cmp(b));

        HistogramSnapshot {
            count: sorted.len(),
            mean: sorted.iter().sum::<f64>() / sorted.len() as f64,
            p50: percentile_of(&sorted, 50.0),
            p95: percentile_of(&sorted, 95.0),
        }
    }
}

fn percentile_of(sorted: &[f64], p: f64) -> f64 {
    let idx = ((sorted.len() as f64) * p / 100.0) as usize;
    sorted[idx.min(sorted.len() - 1)]
}
