use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub filter: FilterSettings,
    #[serde(default)]
    pub report: ReportConfig,
    #[serde(default)]
    pub ai: AiConfig,
    #[serde(default)]
    pub push: PushConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Log level used when RUST_LOG is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Entries taken from each source per run
    #[serde(default = "default_per_source_limit")]
    pub per_source_limit: usize,
    /// Summary length budget in characters
    #[serde(default = "default_summary_chars")]
    pub summary_chars: usize,
    /// Request timeout in seconds
    #[serde(default = "default_fetch_timeout")]
    pub timeout_secs: u64,
    /// Largest feed body accepted, in bytes
    #[serde(default = "default_max_feed_bytes")]
    pub max_feed_bytes: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            per_source_limit: default_per_source_limit(),
            summary_chars: default_summary_chars(),
            timeout_secs: default_fetch_timeout(),
            max_feed_bytes: default_max_feed_bytes(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterSettings {
    /// Cap applied when no include keywords are configured
    #[serde(default = "default_passthrough_limit")]
    pub passthrough_limit: usize,
    /// Cap applied to the filtered, deduplicated result
    #[serde(default = "default_max_items")]
    pub max_items: usize,
    /// Raw items sent when filtering leaves nothing
    #[serde(default = "default_fallback_items")]
    pub fallback_items: usize,
    /// Categories of the sources file treated as include lists
    #[serde(default = "default_include_categories")]
    pub include_categories: Vec<String>,
    /// Categories of the sources file treated as block lists
    #[serde(default = "default_block_categories")]
    pub block_categories: Vec<String>,
}

impl Default for FilterSettings {
    fn default() -> Self {
        Self {
            passthrough_limit: default_passthrough_limit(),
            max_items: default_max_items(),
            fallback_items: default_fallback_items(),
            include_categories: default_include_categories(),
            block_categories: default_block_categories(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Digest title, used for the header and as the push title
    #[serde(default = "default_report_title")]
    pub title: String,
    /// Titles listed by the plain formatter
    #[serde(default = "default_list_limit")]
    pub list_limit: usize,
    /// Print the item link under each title
    #[serde(default)]
    pub include_links: bool,
    /// Final report length bound in characters
    #[serde(default = "default_report_max_chars")]
    pub max_chars: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            title: default_report_title(),
            list_limit: default_list_limit(),
            include_links: false,
            max_chars: default_report_max_chars(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiConfig {
    /// Enable AI summarization (still requires an API key)
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// AI provider: "openai" (any OpenAI-compatible host) or "claude_api"
    #[serde(default = "default_ai_provider")]
    pub provider: String,
    /// API key for the provider
    #[serde(default)]
    pub api_key: Option<String>,
    /// Base URL override; provider default when unset
    #[serde(default)]
    pub api_base: Option<String>,
    /// Model name; provider default when unset
    #[serde(default)]
    pub model: Option<String>,
    /// Digest language (e.g., "English", "Chinese")
    #[serde(default = "default_summary_language")]
    pub summary_language: String,
    /// Items sent in the batch prompt
    #[serde(default = "default_ai_max_items")]
    pub max_items: usize,
    /// Requested digest length in characters
    #[serde(default = "default_target_chars")]
    pub target_chars: usize,
    /// Max tokens for the completion
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Request timeout in seconds
    #[serde(default = "default_ai_timeout")]
    pub timeout_secs: u64,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            provider: default_ai_provider(),
            api_key: None,
            api_base: None,
            model: None,
            summary_language: default_summary_language(),
            max_items: default_ai_max_items(),
            target_chars: default_target_chars(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_ai_timeout(),
        }
    }
}

impl AiConfig {
    /// AI formatting is used only when enabled and a key is present
    pub fn is_active(&self) -> bool {
        self.enabled && self.api_key.as_deref().is_some_and(|k| !k.trim().is_empty())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushConfig {
    /// Per-channel timeout in seconds
    #[serde(default = "default_push_timeout")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub bark: BarkConfig,
    #[serde(default)]
    pub telegram: TelegramConfig,
}

impl Default for PushConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_push_timeout(),
            bark: BarkConfig::default(),
            telegram: TelegramConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BarkConfig {
    /// Device URL, e.g. https://api.day.app/<device key>/
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default = "default_bark_sound")]
    pub sound: String,
    #[serde(default = "default_bark_group")]
    pub group: String,
    /// Keep the notification in Bark history
    #[serde(default = "default_true")]
    pub archive: bool,
    /// Body length bound before encoding
    #[serde(default = "default_report_max_chars")]
    pub max_chars: usize,
}

impl Default for BarkConfig {
    fn default() -> Self {
        Self {
            url: None,
            sound: default_bark_sound(),
            group: default_bark_group(),
            archive: true,
            max_chars: default_report_max_chars(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    #[serde(default)]
    pub bot_token: Option<String>,
    #[serde(default)]
    pub chat_id: Option<String>,
    #[serde(default = "default_telegram_api_base")]
    pub api_base: String,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            bot_token: None,
            chat_id: None,
            api_base: default_telegram_api_base(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_per_source_limit() -> usize {
    3
}

fn default_summary_chars() -> usize {
    100
}

fn default_fetch_timeout() -> u64 {
    20
}

fn default_max_feed_bytes() -> usize {
    5 * 1024 * 1024
}

fn default_passthrough_limit() -> usize {
    20
}

fn default_max_items() -> usize {
    15
}

fn default_fallback_items() -> usize {
    10
}

fn default_include_categories() -> Vec<String> {
    vec![
        "关注行业".to_string(),
        "关注关键词".to_string(),
        "industries".to_string(),
        "keywords".to_string(),
    ]
}

fn default_block_categories() -> Vec<String> {
    vec!["屏蔽词".to_string(), "blocked".to_string()]
}

fn default_report_title() -> String {
    "📊 News Digest".to_string()
}

fn default_list_limit() -> usize {
    10
}

fn default_report_max_chars() -> usize {
    1000
}

fn default_ai_provider() -> String {
    "openai".to_string()
}

fn default_summary_language() -> String {
    "English".to_string()
}

fn default_ai_max_items() -> usize {
    15
}

fn default_target_chars() -> usize {
    500
}

fn default_max_tokens() -> u32 {
    800
}

fn default_ai_timeout() -> u64 {
    30
}

fn default_push_timeout() -> u64 {
    15
}

fn default_bark_sound() -> String {
    "bell".to_string()
}

fn default_bark_group() -> String {
    "news".to_string()
}

fn default_telegram_api_base() -> String {
    "https://api.telegram.org".to_string()
}

/// Read a non-empty environment variable
fn env_value(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

impl AppConfig {
    /// Load configuration from the default path or return defaults
    pub fn load() -> crate::Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from `path`; a missing file yields defaults
    pub fn load_from(path: &Path) -> crate::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Self::from_toml(&content)
        } else {
            Ok(Self::default())
        }
    }

    pub fn from_toml(content: &str) -> crate::Result<Self> {
        toml::from_str(content).map_err(|e| crate::Error::Config(e.to_string()))
    }

    /// Get the configuration file path
    /// Always uses ~/.config/newsbell/config.toml on all platforms
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("newsbell")
            .join("config.toml")
    }

    /// Fill credentials and endpoints from the process environment
    ///
    /// Environment values win over the file so secrets can stay out of it.
    pub fn apply_env(&mut self) {
        self.apply_env_with(env_value);
    }

    fn apply_env_with(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(v) = lookup("AI_API_KEY") {
            self.ai.api_key = Some(v);
        }
        if let Some(v) = lookup("AI_API_BASE") {
            self.ai.api_base = Some(v);
        }
        if let Some(v) = lookup("AI_MODEL") {
            self.ai.model = Some(v);
        }
        if let Some(v) = lookup("AI_PROVIDER") {
            self.ai.provider = v;
        }
        if let Some(v) = lookup("BARK_URL") {
            self.push.bark.url = Some(v);
        }
        if let Some(v) = lookup("TELEGRAM_BOT_TOKEN") {
            self.push.telegram.bot_token = Some(v);
        }
        if let Some(v) = lookup("TELEGRAM_CHAT_ID") {
            self.push.telegram.chat_id = Some(v);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_from_empty_file() {
        let config = AppConfig::from_toml("").unwrap();
        assert_eq!(config.fetch.per_source_limit, 3);
        assert_eq!(config.fetch.summary_chars, 100);
        assert_eq!(config.filter.passthrough_limit, 20);
        assert_eq!(config.filter.max_items, 15);
        assert_eq!(config.filter.fallback_items, 10);
        assert_eq!(config.push.timeout_secs, 15);
        assert!(!config.ai.is_active());
    }

    #[test]
    fn test_partial_sections() {
        let config = AppConfig::from_toml(
            r#"
[fetch]
per_source_limit = 5

[push.bark]
group = "invest"
"#,
        )
        .unwrap();
        assert_eq!(config.fetch.per_source_limit, 5);
        assert_eq!(config.fetch.summary_chars, 100);
        assert_eq!(config.push.bark.group, "invest");
        assert_eq!(config.push.bark.sound, "bell");
        assert!(config.push.bark.archive);
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = AppConfig::from_toml("[fetch\nper_source_limit = ").unwrap_err();
        assert!(matches!(err, crate::Error::Config(_)));
    }

    #[test]
    fn test_env_overlay() {
        let env: HashMap<&str, &str> = [
            ("AI_API_KEY", "sk-test"),
            ("BARK_URL", "https://api.day.app/key"),
            ("TELEGRAM_CHAT_ID", "42"),
        ]
        .into_iter()
        .collect();

        let mut config = AppConfig::default();
        config.apply_env_with(|k| env.get(k).map(|v| v.to_string()));

        assert!(config.ai.is_active());
        assert_eq!(config.push.bark.url.as_deref(), Some("https://api.day.app/key"));
        assert_eq!(config.push.telegram.chat_id.as_deref(), Some("42"));
        assert!(config.push.telegram.bot_token.is_none());
    }

    #[test]
    fn test_blank_key_is_inactive() {
        let mut config = AppConfig::default();
        config.ai.api_key = Some("  ".to_string());
        assert!(!config.ai.is_active());
    }
}
