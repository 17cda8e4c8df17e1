//! Push channels and the dispatcher that fans a report out to them.
//!
//! Each channel is attempted on its own: a failure is logged and recorded,
//! never propagated, so the remaining channels still run.

mod bark;
mod telegram;

use std::time::Duration;

use reqwest::Client;

pub use bark::BarkNotifier;
pub use telegram::{TelegramNotifier, TELEGRAM_MAX_CHARS};

use crate::config::PushConfig;
use crate::Result;

/// A push destination
#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    fn name(&self) -> &str;

    /// Deliver one message; any error means the push did not land
    async fn send(&self, title: &str, content: &str) -> Result<()>;
}

/// Send through one channel, converting any error into `false`
pub async fn push(channel: &dyn Notifier, title: &str, content: &str) -> bool {
    deliver(channel, title, content).await == PushStatus::Delivered
}

async fn deliver(channel: &dyn Notifier, title: &str, content: &str) -> PushStatus {
    match channel.send(title, content).await {
        Ok(()) => {
            tracing::info!("Pushed {} chars to {}", content.chars().count(), channel.name());
            PushStatus::Delivered
        }
        Err(e) => {
            tracing::warn!("Push to {} failed: {}", channel.name(), e);
            PushStatus::Failed(e.to_string())
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushStatus {
    Delivered,
    Failed(String),
    Skipped(String),
}

/// Per-channel result of one dispatch, in channel order
#[derive(Debug, Clone, Default)]
pub struct DispatchReport {
    pub outcomes: Vec<(String, PushStatus)>,
}

impl DispatchReport {
    pub fn any_delivered(&self) -> bool {
        self.outcomes
            .iter()
            .any(|(_, status)| *status == PushStatus::Delivered)
    }

    /// Channels that were actually attempted (not skipped)
    pub fn attempted(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, status)| !matches!(status, PushStatus::Skipped(_)))
            .count()
    }

    /// True when at least one channel was attempted and none delivered
    pub fn all_failed(&self) -> bool {
        self.attempted() > 0 && !self.any_delivered()
    }

    pub fn status(&self, channel: &str) -> Option<&PushStatus> {
        self.outcomes
            .iter()
            .find(|(name, _)| name == channel)
            .map(|(_, status)| status)
    }
}

/// The configured set of channels for a run
#[derive(Default)]
pub struct Dispatcher {
    channels: Vec<Box<dyn Notifier>>,
    skipped: Vec<(String, String)>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build channels from configuration; unconfigured ones are recorded as skipped
    pub fn from_config(config: &PushConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        let mut dispatcher = Self::new();

        match config.bark.url.as_deref().filter(|u| !u.trim().is_empty()) {
            Some(url) => dispatcher.add(Box::new(BarkNotifier::new(
                client.clone(),
                url,
                &config.bark,
            ))),
            None => dispatcher.skip("bark", "BARK_URL not configured"),
        }

        let telegram = &config.telegram;
        match (
            telegram.bot_token.as_deref().filter(|t| !t.trim().is_empty()),
            telegram.chat_id.as_deref().filter(|c| !c.trim().is_empty()),
        ) {
            (Some(token), Some(chat_id)) => dispatcher.add(Box::new(TelegramNotifier::new(
                client,
                &telegram.api_base,
                token,
                chat_id,
            ))),
            _ => dispatcher.skip("telegram", "bot token or chat id not configured"),
        }

        Ok(dispatcher)
    }

    pub fn add(&mut self, channel: Box<dyn Notifier>) {
        self.channels.push(channel);
    }

    pub fn skip(&mut self, channel: &str, reason: &str) {
        tracing::info!("Skipping {}: {}", channel, reason);
        self.skipped.push((channel.to_string(), reason.to_string()));
    }

    pub fn has_channels(&self) -> bool {
        !self.channels.is_empty()
    }

    /// Attempt every channel once, in order
    pub async fn dispatch(&self, title: &str, content: &str) -> DispatchReport {
        let mut report = DispatchReport::default();

        for channel in &self.channels {
            let status = deliver(channel.as_ref(), title, content).await;
            report.outcomes.push((channel.name().to_string(), status));
        }

        for (name, reason) in &self.skipped {
            report
                .outcomes
                .push((name.clone(), PushStatus::Skipped(reason.clone())));
        }

        report
    }
}
