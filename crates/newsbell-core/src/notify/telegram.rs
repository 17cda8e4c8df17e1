use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use super::Notifier;
use crate::feed::truncate_chars;
use crate::{Error, Result};

const CHANNEL: &str = "telegram";

/// Bot API message length limit
pub const TELEGRAM_MAX_CHARS: usize = 4096;

#[derive(Deserialize)]
struct TelegramResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

/// Telegram Bot API `sendMessage` channel
pub struct TelegramNotifier {
    client: Client,
    api_base: String,
    bot_token: String,
    chat_id: String,
}

impl TelegramNotifier {
    pub fn new(client: Client, api_base: &str, bot_token: &str, chat_id: &str) -> Self {
        Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
            bot_token: bot_token.to_string(),
            chat_id: chat_id.to_string(),
        }
    }

    fn message_text(title: &str, content: &str) -> String {
        let text = format!("{}\n\n{}", title, content);
        truncate_chars(&text, TELEGRAM_MAX_CHARS).to_string()
    }
}

#[async_trait::async_trait]
impl Notifier for TelegramNotifier {
    fn name(&self) -> &str {
        CHANNEL
    }

    async fn send(&self, title: &str, content: &str) -> Result<()> {
        let url = format!("{}/bot{}/sendMessage", self.api_base, self.bot_token);

        let resp = self
            .client
            .post(&url)
            .json(&json!({
                "chat_id": self.chat_id,
                "text": Self::message_text(title, content),
                "disable_web_page_preview": true
            }))
            .send()
            .await
            // reqwest errors carry the URL, which contains the bot token
            .map_err(|e| Error::push(CHANNEL, e.without_url().to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let error_text = resp.text().await.unwrap_or_default();
            return Err(Error::push(CHANNEL, format!("HTTP {}: {}", status, error_text)));
        }

        let reply: TelegramResponse = resp
            .json()
            .await
            .map_err(|e| Error::push(CHANNEL, format!("Malformed response: {}", e.without_url())))?;

        if !reply.ok {
            return Err(Error::push(
                CHANNEL,
                reply.description.unwrap_or_else(|| "ok=false".to_string()),
            ));
        }

        Ok(())
    }
}
