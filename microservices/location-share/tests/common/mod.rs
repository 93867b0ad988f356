//! Shared fixtures for Location Share integration tests

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use location_share::model::{Coordinates, LocationRecord};
use location_share::notifier::{LocationNotifier, NotifierError, NotifyResult};
use location_share::store::{InMemoryLocationStore, LocationStore, StoreError, StoreResult};
use liveshare_core::ServiceConfig;
use liveshare_docstore::PoolConfig;
use location_share::config::StoreBackend;
use location_share::notifier::TelegramConfig;
use location_share::{create_router, AppState, Config, LocationService, Timeouts};
use parking_lot::Mutex;
use serde_json::Value;
use tower::ServiceExt;

/// How the scripted notifier answers
#[derive(Clone, Copy)]
pub enum NotifyMode {
    Succeed,
    Reject,
    Hang,
}

/// Notifier that records every push and can observe the store at push time
pub struct ScriptedNotifier {
    mode: NotifyMode,
    store: Option<Arc<InMemoryLocationStore>>,
    pub calls: Mutex<Vec<Coordinates>>,
    pub store_len_at_call: Mutex<Vec<usize>>,
}

impl ScriptedNotifier {
    pub fn new(mode: NotifyMode) -> Self {
        Self {
            mode,
            store: None,
            calls: Mutex::new(Vec::new()),
            store_len_at_call: Mutex::new(Vec::new()),
        }
    }

    pub fn observing(mode: NotifyMode, store: Arc<InMemoryLocationStore>) -> Self {
        Self {
            store: Some(store),
            ..Self::new(mode)
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

#[async_trait]
impl LocationNotifier for ScriptedNotifier {
    fn sink(&self) -> &'static str {
        "scripted"
    }

    fn is_configured(&self) -> bool {
        true
    }

    async fn notify(&self, coordinates: &Coordinates) -> NotifyResult<()> {
        self.calls.lock().push(*coordinates);
        if let Some(store) = &self.store {
            self.store_len_at_call.lock().push(store.len());
        }
        match self.mode {
            NotifyMode::Succeed => Ok(()),
            NotifyMode::Reject => Err(NotifierError::Rejected {
                status: 502,
                body: "bad gateway".to_string(),
            }),
            NotifyMode::Hang => {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Ok(())
            }
        }
    }
}

/// Store whose every call fails (or hangs)
pub struct BrokenStore {
    pub hang: bool,
}

#[async_trait]
impl LocationStore for BrokenStore {
    fn backend(&self) -> &'static str {
        "broken"
    }

    async fn insert(&self, _record: &LocationRecord) -> StoreResult<()> {
        self.fail().await
    }

    async fn list_recent(&self, _limit: usize) -> StoreResult<Vec<LocationRecord>> {
        self.fail().await
    }

    async fn clear(&self) -> StoreResult<u64> {
        self.fail().await
    }

    async fn is_healthy(&self) -> bool {
        false
    }

    fn close(&self) {}
}

impl BrokenStore {
    async fn fail<T>(&self) -> StoreResult<T> {
        if self.hang {
            tokio::time::sleep(Duration::from_secs(30)).await;
        }
        Err(StoreError::Closed)
    }
}

pub fn fast_timeouts() -> Timeouts {
    Timeouts {
        store: Duration::from_millis(200),
        notify: Duration::from_millis(200),
    }
}

/// In-memory configuration for building a `LocationShareApp`
pub fn test_config() -> Config {
    Config {
        service: ServiceConfig {
            service_name: "location-share-test".to_string(),
            http_bind: "127.0.0.1:0".parse().unwrap(),
        },
        store_backend: StoreBackend::Memory,
        docstore: PoolConfig::default(),
        collection: "locations".to_string(),
        timeouts: fast_timeouts(),
        telegram: TelegramConfig::default(),
        cors_origins: vec!["*".to_string()],
    }
}

pub struct Harness {
    pub store: Arc<InMemoryLocationStore>,
    pub notifier: Arc<ScriptedNotifier>,
    pub service: LocationService,
}

impl Harness {
    pub fn new(mode: NotifyMode) -> Self {
        let store = Arc::new(InMemoryLocationStore::new());
        let notifier = Arc::new(ScriptedNotifier::observing(mode, store.clone()));
        let service = LocationService::new(store.clone(), notifier.clone(), fast_timeouts());
        Self {
            store,
            notifier,
            service,
        }
    }

    pub fn router(&self) -> Router {
        self.router_with_origins(&["*".to_string()])
    }

    pub fn router_with_origins(&self, origins: &[String]) -> Router {
        create_router(AppState::new(self.service.clone()), origins)
    }
}

pub async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.expect("execute request");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read response body");
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("response body should be JSON")
    };
    (status, value)
}
