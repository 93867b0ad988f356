//! HTTP handlers for the Location Share API

use axum::{extract::rejection::JsonRejection, extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::config::SERVICE_ID;
use crate::metrics::MetricsSnapshot;
use crate::model::{ClearResponse, LocationRecord, RootResponse, ShareLocationRequest};
use crate::{AppState, Result};

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub uptime_seconds: u64,
}

/// Ready check response
#[derive(Serialize)]
pub struct ReadyResponse {
    pub ready: bool,
    pub store: bool,
    pub store_backend: String,
    pub notifier_configured: bool,
}

/// Stats response
#[derive(Serialize)]
pub struct StatsResponse {
    pub uptime_seconds: u64,
    #[serde(flatten)]
    pub metrics: MetricsSnapshot,
}

// ============================================
// Location API
// ============================================

pub async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: "Location Sharing API".to_string(),
    })
}

pub async fn share_location(
    State(state): State<AppState>,
    payload: std::result::Result<Json<ShareLocationRequest>, JsonRejection>,
) -> Result<Json<LocationRecord>> {
    let Json(request) = payload?;
    let record = state.service.share_location(request).await?;
    Ok(Json(record))
}

pub async fn list_locations(State(state): State<AppState>) -> Result<Json<Vec<LocationRecord>>> {
    let locations = state.service.list_locations().await?;
    Ok(Json(locations))
}

pub async fn clear_locations(State(state): State<AppState>) -> Result<Json<ClearResponse>> {
    let deleted_count = state.service.clear_locations().await?;
    Ok(Json(ClearResponse { deleted_count }))
}

// ============================================
// Health & Metrics
// ============================================

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: SERVICE_ID.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
    })
}

pub async fn ready(State(state): State<AppState>) -> (StatusCode, Json<ReadyResponse>) {
    let store_ok = state.service.store_healthy().await;
    let status = if store_ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(ReadyResponse {
            ready: store_ok,
            store: store_ok,
            store_backend: state.service.store_backend().to_string(),
            notifier_configured: state.service.notifier_configured(),
        }),
    )
}

pub async fn stats(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse {
        uptime_seconds: state.started_at.elapsed().as_secs(),
        metrics: state.service.metrics().snapshot(),
    })
}
