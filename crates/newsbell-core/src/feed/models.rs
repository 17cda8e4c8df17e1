use serde::{Deserialize, Serialize};

/// A news entry taken from a feed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsItem {
    pub title: String,
    pub link: Option<String>,
    /// Plain-text summary, already cut to the configured budget
    pub summary: String,
    /// Publication time as RFC 3339 text
    pub published: Option<String>,
    /// Name of the source the item came from
    pub source: String,
}

impl NewsItem {
    pub fn new(title: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            link: None,
            summary: summary.into(),
            published: None,
            source: String::new(),
        }
    }

    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }

    /// Text searched by keyword rules
    pub fn match_text(&self) -> String {
        format!("{}{}", self.title, self.summary)
    }
}

/// Result of fetching every enabled source once
#[derive(Debug, Clone, Default)]
pub struct FetchBatch {
    pub items: Vec<NewsItem>,
    pub succeeded: usize,
    pub failed: usize,
}

impl FetchBatch {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Cut `input` to at most `max_chars` characters
pub fn truncate_chars(input: &str, max_chars: usize) -> &str {
    match input.char_indices().nth(max_chars) {
        Some((idx, _)) => &input[..idx],
        None => input,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_chars_multibyte() {
        assert_eq!(truncate_chars("半导体板块大涨", 3), "半导体");
        assert_eq!(truncate_chars("short", 10), "short");
        assert_eq!(truncate_chars("abc", 0), "");
    }

    #[test]
    fn test_match_text_concatenates() {
        let item = NewsItem::new("Chip", "stocks rally");
        assert_eq!(item.match_text(), "Chipstocks rally");
    }
}
