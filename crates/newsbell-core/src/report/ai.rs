use chrono::Local;

use super::ReportFormatter;
use crate::ai::Summarizer;
use crate::feed::NewsItem;
use crate::Result;

/// Digest written by a text-generation model, headed like the plain report
pub struct AiFormatter {
    summarizer: Summarizer,
    title: String,
}

impl AiFormatter {
    pub fn new(summarizer: Summarizer, title: impl Into<String>) -> Self {
        Self {
            summarizer,
            title: title.into(),
        }
    }
}

#[async_trait::async_trait]
impl ReportFormatter for AiFormatter {
    fn name(&self) -> &str {
        self.summarizer.provider_name()
    }

    async fn format(&self, items: &[NewsItem]) -> Result<String> {
        let digest = self.summarizer.summarize(items).await?;
        Ok(format!(
            "{} ({})\n\n{}",
            self.title,
            Local::now().format("%m-%d %H:%M"),
            digest
        ))
    }
}
