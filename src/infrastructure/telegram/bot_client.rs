use std::time::Duration;

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;

use crate::{application::interfaces::reminders::ReminderNotifier, config::config_model::Telegram};

pub struct TelegramBotClient {
    endpoint: String,
    client: Client,
}

impl TelegramBotClient {
    pub fn new(telegram: &Telegram) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(telegram.timeout))
            .build()?;

        Ok(Self {
            endpoint: format!("{}{}/sendMessage", telegram.bot_url, telegram.bot_token),
            client,
        })
    }
}

#[async_trait]
impl ReminderNotifier for TelegramBotClient {
    async fn send_message(&self, chat_id: &str, text: &str) -> Result<()> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&json!({ "chat_id": chat_id, "text": text }))
            .send()
            .await
            .map_err(sanitize_reqwest_error)?;

        if response.status().is_success() {
            return Ok(());
        }

        Err(anyhow!(
            "telegram sendMessage returned non-success status: {}",
            response.status()
        ))
    }
}

// The request url embeds the bot token, so reqwest's own message never reaches the logs.
fn sanitize_reqwest_error(error: reqwest::Error) -> anyhow::Error {
    if error.is_timeout() {
        return anyhow!("telegram request timed out");
    }
    if error.is_connect() {
        return anyhow!("telegram connection failed");
    }
    anyhow!("telegram request failed")
}
