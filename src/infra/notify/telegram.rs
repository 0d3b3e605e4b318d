use crate::domain::ports::NotificationService;
use crate::error::AppError;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use std::time::Duration;
use tracing::{debug, error};

/// Sends operator notices to the admin's Telegram chat. When the bot token
/// or chat id is not configured, every send is a silent no-op.
pub struct TelegramNotifier {
    client: Client,
    bot_token: Option<String>,
    chat_id: Option<String>,
}

impl TelegramNotifier {
    pub fn new(bot_token: Option<String>, chat_id: Option<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .expect("Failed to build HTTP client");

        Self { client, bot_token, chat_id }
    }
}

#[async_trait]
impl NotificationService for TelegramNotifier {
    async fn send(&self, text: &str) -> Result<(), AppError> {
        let (Some(token), Some(chat_id)) = (&self.bot_token, &self.chat_id) else {
            debug!("Telegram not configured, skipping notification");
            return Ok(());
        };

        let url = format!("https://api.telegram.org/bot{}/sendMessage", token);

        let res = self.client
            .post(&url)
            .json(&json!({
                "chat_id": chat_id,
                "text": text,
                "parse_mode": "Markdown",
            }))
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("Telegram connection error: {}", e)))?;

        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            error!("Telegram send failed. Status: {}, Body: {}", status, body);
            return Err(AppError::Upstream(format!("Telegram send failed with status {}", status)));
        }

        Ok(())
    }
}
