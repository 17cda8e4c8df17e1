use chrono::{DateTime, Local, TimeZone};

use super::ReportFormatter;
use crate::config::ReportConfig;
use crate::feed::NewsItem;
use crate::Result;

const EMPTY_REPORT: &str = "No matching news right now";

/// Deterministic numbered list of titles; never fails
pub struct PlainFormatter {
    title: String,
    list_limit: usize,
    include_links: bool,
}

impl PlainFormatter {
    pub fn new(config: &ReportConfig) -> Self {
        Self {
            title: config.title.clone(),
            list_limit: config.list_limit,
            include_links: config.include_links,
        }
    }

    /// Render with an explicit timestamp for the header
    pub fn render_at<Tz: TimeZone>(&self, items: &[NewsItem], now: &DateTime<Tz>) -> String
    where
        Tz::Offset: std::fmt::Display,
    {
        if items.is_empty() {
            return EMPTY_REPORT.to_string();
        }

        let mut out = format!("{} ({})\n\n", self.title, now.format("%m-%d %H:%M"));

        for (i, item) in items.iter().take(self.list_limit).enumerate() {
            out.push_str(&format!("{}. {}\n", i + 1, item.title));
            if self.include_links {
                if let Some(link) = &item.link {
                    out.push_str(&format!("   {}\n", link));
                }
            }
            out.push('\n');
        }

        out.push_str(&format!("{} related items in total", items.len()));
        out
    }

    pub fn render(&self, items: &[NewsItem]) -> String {
        self.render_at(items, &Local::now())
    }
}

#[async_trait::async_trait]
impl ReportFormatter for PlainFormatter {
    fn name(&self) -> &str {
        "plain"
    }

    async fn format(&self, items: &[NewsItem]) -> Result<String> {
        Ok(self.render(items))
    }
}
