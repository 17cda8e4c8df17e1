mod claude_api;
mod openai;

use std::time::Duration;

pub use claude_api::ClaudeApiProvider;
pub use openai::OpenAiProvider;

use reqwest::Client;

use crate::config::AiConfig;
use crate::{Error, Result};

/// Trait for text-generation backends
#[async_trait::async_trait]
pub trait TextGenerator: Send + Sync {
    /// Provider name for log lines
    fn name(&self) -> &str;

    /// Send a single-turn prompt and return the completion text
    async fn generate(&self, prompt: &str, max_tokens: u32) -> Result<String>;
}

/// Build the configured provider; fails when no API key is set
pub fn build_provider(config: &AiConfig) -> Result<Box<dyn TextGenerator>> {
    let api_key = config
        .api_key
        .as_deref()
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .ok_or_else(|| Error::Config("AI API key not configured".to_string()))?;

    let client = Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?;

    let provider: Box<dyn TextGenerator> = match config.provider.as_str() {
        "claude_api" => Box::new(ClaudeApiProvider::new(
            client,
            api_key,
            config.api_base.as_deref(),
            config.model.as_deref(),
        )),
        "openai" => Box::new(OpenAiProvider::new(
            client,
            api_key,
            config.api_base.as_deref(),
            config.model.as_deref(),
        )),
        other => {
            return Err(Error::Config(format!("Unknown AI provider: {}", other)));
        }
    };

    Ok(provider)
}

/// Join a base URL and a path without doubling slashes
fn endpoint(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_key_is_config_error() {
        let err = build_provider(&AiConfig::default()).err().unwrap();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_provider_selection() {
        let mut config = AiConfig {
            api_key: Some("key".to_string()),
            ..AiConfig::default()
        };
        assert_eq!(build_provider(&config).unwrap().name(), "openai");

        config.provider = "claude_api".to_string();
        assert_eq!(build_provider(&config).unwrap().name(), "claude_api");

        config.provider = "gemini_cli".to_string();
        assert!(build_provider(&config).is_err());
    }

    #[test]
    fn test_endpoint_join() {
        assert_eq!(
            endpoint("https://api.deepseek.com/", "/chat/completions"),
            "https://api.deepseek.com/chat/completions"
        );
    }
}
