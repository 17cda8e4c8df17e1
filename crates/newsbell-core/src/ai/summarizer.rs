use super::providers::{build_provider, TextGenerator};
use crate::config::AiConfig;
use crate::feed::{truncate_chars, NewsItem};
use crate::{Error, Result};

/// Turns a batch of news items into a ranked digest through a text generator
pub struct Summarizer {
    provider: Box<dyn TextGenerator>,
    language: String,
    max_items: usize,
    target_chars: usize,
    max_tokens: u32,
}

impl Summarizer {
    /// Create a summarizer from configuration
    pub fn new(config: &AiConfig) -> Result<Self> {
        let provider = build_provider(config)?;
        Ok(Self::with_provider(provider, config))
    }

    pub fn with_provider(provider: Box<dyn TextGenerator>, config: &AiConfig) -> Self {
        Self {
            provider,
            language: config.summary_language.clone(),
            max_items: config.max_items.max(1),
            target_chars: config.target_chars.max(1),
            max_tokens: config.max_tokens.max(1),
        }
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Build the batch prompt for up to `max_items` items
    pub fn build_prompt(&self, items: &[NewsItem]) -> String {
        let language = &self.language;
        let target = self.target_chars;
        let mut prompt = format!(
            "You are a news editor preparing a short mobile push digest.\n\
Rank the headlines below by importance for an investor. Tag each entry with \
an importance marker: 🔴 high, 🟡 medium, 🟢 low. Merge duplicates, drop noise, \
and write the whole digest in {language} using at most {target} characters.\n\
Reply with the digest only, one entry per line, formatted as: marker title - one-line takeaway.\n\n"
        );

        for (i, item) in items.iter().take(self.max_items).enumerate() {
            prompt.push_str(&format!("{}. {}", i + 1, item.title));
            if !item.summary.is_empty() {
                prompt.push_str(&format!(" | {}", truncate_chars(&item.summary, 200)));
            }
            prompt.push('\n');
        }

        prompt
    }

    /// Ask the provider for a digest of `items`
    pub async fn summarize(&self, items: &[NewsItem]) -> Result<String> {
        if items.is_empty() {
            return Err(Error::AiProvider("Nothing to summarize".to_string()));
        }

        let prompt = self.build_prompt(items);
        tracing::debug!(
            "Requesting digest of {} items from {}",
            items.len().min(self.max_items),
            self.provider.name()
        );

        let digest = self.provider.generate(&prompt, self.max_tokens).await?;
        Ok(digest.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    struct Recorder {
        prompts: Arc<Mutex<Vec<String>>>,
        reply: String,
    }

    #[async_trait::async_trait]
    impl TextGenerator for Recorder {
        fn name(&self) -> &str {
            "recorder"
        }

        async fn generate(&self, prompt: &str, _max_tokens: u32) -> Result<String> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            Ok(self.reply.clone())
        }
    }

    fn summarizer(max_items: usize, reply: &str) -> (Summarizer, Arc<Mutex<Vec<String>>>) {
        let prompts = Arc::new(Mutex::new(Vec::new()));
        let provider = Recorder {
            prompts: Arc::clone(&prompts),
            reply: reply.to_string(),
        };
        let config = AiConfig {
            max_items,
            summary_language: "Chinese".to_string(),
            ..AiConfig::default()
        };
        (Summarizer::with_provider(Box::new(provider), &config), prompts)
    }

    #[tokio::test]
    async fn test_prompt_is_capped_to_max_items() {
        let (summarizer, prompts) = summarizer(2, "  🔴 A - up  \n");
        let items = vec![
            NewsItem::new("First", "one"),
            NewsItem::new("Second", ""),
            NewsItem::new("Third", "three"),
        ];

        let digest = summarizer.summarize(&items).await.unwrap();
        assert_eq!(digest, "🔴 A - up");

        let prompt = prompts.lock().unwrap()[0].clone();
        assert!(prompt.contains("in Chinese"));
        assert!(prompt.contains("1. First | one\n"));
        assert!(prompt.contains("2. Second\n"));
        assert!(!prompt.contains("Third"));
    }

    #[tokio::test]
    async fn test_empty_batch_is_error() {
        let (summarizer, prompts) = summarizer(5, "unused");
        assert!(summarizer.summarize(&[]).await.is_err());
        assert!(prompts.lock().unwrap().is_empty());
    }
}
