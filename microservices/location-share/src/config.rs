//! Configuration for Location Share

use std::time::Duration;

use liveshare_core::{LiveshareError, Result, ServiceConfig};
use liveshare_docstore::PoolConfig;

use crate::notifier::telegram::{TelegramConfig, DEFAULT_API_BASE};
use crate::service::Timeouts;

pub const SERVICE_ID: &str = "location-share";

/// Which `LocationStore` backend to run with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    DocStore,
    Memory,
}

impl std::str::FromStr for StoreBackend {
    type Err = LiveshareError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "docstore" | "" => Ok(Self::DocStore),
            "memory" => Ok(Self::Memory),
            other => Err(LiveshareError::Config(format!(
                "Invalid LOCATION_STORE: {} (expected docstore or memory)",
                other
            ))),
        }
    }
}

/// Location Share configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub service: ServiceConfig,
    pub store_backend: StoreBackend,
    pub docstore: PoolConfig,
    /// Collection holding location records
    pub collection: String,
    pub timeouts: Timeouts,
    pub telegram: TelegramConfig,
    /// Allowed cross-origin sources; `*` allows any
    pub cors_origins: Vec<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let timeouts = Timeouts {
            store: secs_var("STORE_TIMEOUT_SECS", 5)?,
            notify: secs_var("NOTIFY_TIMEOUT_SECS", 10)?,
        };

        Ok(Self {
            service: ServiceConfig::with_default_name(SERVICE_ID)?,
            store_backend: std::env::var("LOCATION_STORE")
                .unwrap_or_else(|_| "docstore".to_string())
                .parse()?,
            docstore: PoolConfig::from_env(),
            collection: std::env::var("LOCATIONS_COLLECTION")
                .unwrap_or_else(|_| "locations".to_string()),
            timeouts,
            telegram: TelegramConfig {
                bot_token: non_empty_var("TELEGRAM_BOT_TOKEN"),
                chat_id: non_empty_var("TELEGRAM_CHAT_ID"),
                api_base: std::env::var("TELEGRAM_API_BASE")
                    .unwrap_or_else(|_| DEFAULT_API_BASE.to_string()),
                timeout: timeouts.notify,
            },
            cors_origins: parse_origins(
                &std::env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string()),
            ),
        })
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn secs_var(name: &str, default: u64) -> Result<Duration> {
    match std::env::var(name) {
        Ok(raw) => parse_secs(name, &raw),
        Err(_) => Ok(Duration::from_secs(default)),
    }
}

fn parse_secs(name: &str, raw: &str) -> Result<Duration> {
    let secs: f64 = raw
        .trim()
        .parse()
        .map_err(|e| LiveshareError::Config(format!("Invalid {}: {}", name, e)))?;
    if !secs.is_finite() || secs <= 0.0 {
        return Err(LiveshareError::Config(format!(
            "Invalid {}: must be a positive number of seconds",
            name
        )));
    }
    Ok(Duration::from_secs_f64(secs))
}

pub fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(str::to_string)
        .collect()
}
