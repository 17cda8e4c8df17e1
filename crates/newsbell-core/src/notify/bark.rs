use reqwest::Client;
use serde::Deserialize;

use super::Notifier;
use crate::config::BarkConfig;
use crate::feed::truncate_chars;
use crate::{Error, Result};

const CHANNEL: &str = "bark";

#[derive(Deserialize)]
struct BarkResponse {
    code: i64,
    #[serde(default)]
    message: String,
}

/// Bark iOS push gateway; title and body travel as path segments
pub struct BarkNotifier {
    client: Client,
    base_url: String,
    sound: String,
    group: String,
    archive: bool,
    max_chars: usize,
}

impl BarkNotifier {
    pub fn new(client: Client, base_url: &str, config: &BarkConfig) -> Self {
        let mut base_url = base_url.trim().to_string();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }

        Self {
            client,
            base_url,
            sound: config.sound.clone(),
            group: config.group.clone(),
            archive: config.archive,
            max_chars: config.max_chars,
        }
    }

    /// Request URL without query parameters
    fn push_url(&self, title: &str, content: &str) -> String {
        let body = truncate_chars(content, self.max_chars);
        format!(
            "{}{}/{}",
            self.base_url,
            urlencoding::encode(title),
            urlencoding::encode(body)
        )
    }
}

#[async_trait::async_trait]
impl Notifier for BarkNotifier {
    fn name(&self) -> &str {
        CHANNEL
    }

    async fn send(&self, title: &str, content: &str) -> Result<()> {
        let url = self.push_url(title, content);
        tracing::debug!(
            "Bark request: {}{}/... ({} chars)",
            self.base_url.chars().take(40).collect::<String>(),
            urlencoding::encode(title),
            content.chars().count()
        );

        let archive = if self.archive { "1" } else { "0" };
        let response = self
            .client
            .get(&url)
            .query(&[
                ("sound", self.sound.as_str()),
                ("group", self.group.as_str()),
                ("isArchive", archive),
            ])
            .send()
            .await
            .map_err(|e| Error::push(CHANNEL, e.without_url().to_string()))?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::push(CHANNEL, format!("HTTP {}: {}", status, body)));
        }

        let reply: BarkResponse = response
            .json()
            .await
            .map_err(|e| {
                Error::push(CHANNEL, format!("Malformed response: {}", e.without_url()))
            })?;

        if reply.code != 200 {
            return Err(Error::push(
                CHANNEL,
                format!("Bark returned code {}: {}", reply.code, reply.message),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notifier(max_chars: usize) -> BarkNotifier {
        let config = BarkConfig {
            max_chars,
            ..BarkConfig::default()
        };
        BarkNotifier::new(Client::new(), "https://api.day.app/devicekey", &config)
    }

    #[test]
    fn test_path_segments_are_encoded() {
        let url = notifier(1000).push_url("📊 News", "a/b c\n1. 半导体");
        assert_eq!(
            url,
            "https://api.day.app/devicekey/%F0%9F%93%8A%20News/a%2Fb%20c%0A1.%20%E5%8D%8A%E5%AF%BC%E4%BD%93"
        );
    }

    #[test]
    fn test_body_is_cut_before_encoding() {
        let url = notifier(3).push_url("t", "abcdef");
        assert!(url.ends_with("/t/abc"));
    }
}
