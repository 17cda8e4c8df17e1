use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{endpoint, TextGenerator};
use crate::{Error, Result};

const DEFAULT_API_BASE: &str = "https://api.anthropic.com";
const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";

#[derive(Serialize)]
struct ClaudeRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<ClaudeMessage<'a>>,
}

#[derive(Serialize)]
struct ClaudeMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ClaudeResponse {
    content: Option<Vec<ClaudeContent>>,
    error: Option<ClaudeError>,
}

#[derive(Deserialize)]
struct ClaudeContent {
    #[serde(default)]
    text: String,
}

#[derive(Deserialize)]
struct ClaudeError {
    message: String,
}

/// Claude/Anthropic messages API provider
pub struct ClaudeApiProvider {
    client: Client,
    api_key: String,
    api_base: String,
    model: String,
}

impl ClaudeApiProvider {
    pub fn new(client: Client, api_key: &str, api_base: Option<&str>, model: Option<&str>) -> Self {
        Self {
            client,
            api_key: api_key.to_string(),
            api_base: api_base.unwrap_or(DEFAULT_API_BASE).to_string(),
            model: model.unwrap_or(DEFAULT_MODEL).to_string(),
        }
    }
}

#[async_trait::async_trait]
impl TextGenerator for ClaudeApiProvider {
    fn name(&self) -> &str {
        "claude_api"
    }

    async fn generate(&self, prompt: &str, max_tokens: u32) -> Result<String> {
        let request = ClaudeRequest {
            model: &self.model,
            max_tokens,
            messages: vec![ClaudeMessage {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .client
            .post(endpoint(&self.api_base, "v1/messages"))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::AiProvider(format!("Claude API request failed: {}", e)))?;

        let status = response.status();
        let claude_response: ClaudeResponse = response
            .json()
            .await
            .map_err(|e| Error::AiProvider(format!("Failed to parse Claude response: {}", e)))?;

        if let Some(error) = claude_response.error {
            return Err(Error::AiProvider(format!("Claude API error: {}", error.message)));
        }
        if !status.is_success() {
            return Err(Error::AiProvider(format!("Claude API returned HTTP {}", status)));
        }

        let text: String = claude_response
            .content
            .unwrap_or_default()
            .into_iter()
            .map(|c| c.text)
            .collect();

        if text.trim().is_empty() {
            return Err(Error::AiProvider("Empty content in Claude response".to_string()));
        }

        Ok(text)
    }
}
