//! Telegram Bot API notifier

use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use tracing::debug;

use super::{LocationNotifier, NotifierError, NotifyResult};
use crate::model::Coordinates;

pub const DEFAULT_API_BASE: &str = "https://api.telegram.org";

#[derive(Clone)]
pub struct TelegramConfig {
    pub bot_token: Option<String>,
    pub chat_id: Option<String>,
    pub api_base: String,
    pub timeout: Duration,
}

impl std::fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramConfig")
            .field("bot_token", &self.bot_token.as_ref().map(|_| "<redacted>"))
            .field("chat_id", &self.chat_id)
            .field("api_base", &self.api_base)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            bot_token: None,
            chat_id: None,
            api_base: DEFAULT_API_BASE.to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

pub struct TelegramNotifier {
    config: TelegramConfig,
    http_client: reqwest::Client,
}

impl TelegramNotifier {
    pub fn new(config: TelegramConfig) -> NotifyResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| NotifierError::Network(e.to_string()))?;

        Ok(Self {
            config,
            http_client,
        })
    }

    fn credentials(&self) -> NotifyResult<(&str, &str)> {
        match (self.config.bot_token.as_deref(), self.config.chat_id.as_deref()) {
            (Some(token), Some(chat_id)) if !token.is_empty() && !chat_id.is_empty() => {
                Ok((token, chat_id))
            }
            (None, _) | (Some(""), _) => Err(NotifierError::NotConfigured(
                "TELEGRAM_BOT_TOKEN is not set".to_string(),
            )),
            _ => Err(NotifierError::NotConfigured(
                "TELEGRAM_CHAT_ID is not set".to_string(),
            )),
        }
    }

    fn method_url(&self, token: &str, method: &str) -> String {
        format!(
            "{}/bot{}/{}",
            self.config.api_base.trim_end_matches('/'),
            token,
            method
        )
    }

    fn map_send_error(&self, e: reqwest::Error) -> NotifierError {
        if e.is_timeout() {
            NotifierError::Timeout(self.config.timeout)
        } else {
            // The request URL embeds the bot token
            NotifierError::Network(e.without_url().to_string())
        }
    }
}

#[async_trait]
impl LocationNotifier for TelegramNotifier {
    fn sink(&self) -> &'static str {
        "telegram"
    }

    fn is_configured(&self) -> bool {
        self.credentials().is_ok()
    }

    async fn notify(&self, coordinates: &Coordinates) -> NotifyResult<()> {
        let (token, chat_id) = self.credentials()?;

        let payload = json!({
            "chat_id": chat_id,
            "latitude": coordinates.latitude,
            "longitude": coordinates.longitude,
        });

        let response = self
            .http_client
            .post(self.method_url(token, "sendLocation"))
            .json(&payload)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        if status.is_success() {
            debug!(status = status.as_u16(), "Telegram accepted location");
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(NotifierError::Rejected {
                status: status.as_u16(),
                body,
            })
        }
    }
}
