//! Runtime configuration shared by all microservices

use crate::error::{LiveshareError, Result};
use std::env;
use std::net::SocketAddr;

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub service_name: String,
    pub http_bind: SocketAddr,
}

impl ServiceConfig {
    /// Load from environment, falling back to `default_name` when `SERVICE_NAME` is unset
    pub fn with_default_name(default_name: &str) -> Result<Self> {
        Ok(Self {
            service_name: env::var("SERVICE_NAME").unwrap_or_else(|_| default_name.to_string()),
            http_bind: env::var("HTTP_BIND")
                .unwrap_or_else(|_| "0.0.0.0:8080".to_string())
                .parse()
                .map_err(|e| LiveshareError::Config(format!("Invalid HTTP_BIND: {}", e)))?,
        })
    }
}
