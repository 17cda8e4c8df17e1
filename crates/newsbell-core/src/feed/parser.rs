use feed_rs::parser;

use super::models::{truncate_chars, NewsItem};
use crate::{Error, Result};

/// Per-source entry policy
#[derive(Debug, Clone, Copy)]
pub struct EntryLimits {
    pub max_entries: usize,
    pub summary_chars: usize,
}

/// Parse RSS/Atom content into at most `limits.max_entries` items
pub fn parse_feed(content: &[u8], source: &str, limits: EntryLimits) -> Result<Vec<NewsItem>> {
    let feed = parser::parse(content).map_err(|e| Error::FeedParse(e.to_string()))?;

    let items = feed
        .entries
        .into_iter()
        .filter_map(|entry| {
            let title = entry
                .title
                .map(|t| collapse_whitespace(&t.content))
                .filter(|t| !t.is_empty())?;

            let link = entry.links.first().map(|l| l.href.clone());

            let raw_summary = entry
                .summary
                .map(|s| s.content)
                .or_else(|| entry.content.and_then(|c| c.body))
                .unwrap_or_default();
            let summary_text = collapse_whitespace(&html_to_text(&raw_summary));
            let summary = truncate_chars(&summary_text, limits.summary_chars).to_string();

            let published = entry.published.or(entry.updated).map(|dt| dt.to_rfc3339());

            Some(NewsItem {
                title,
                link,
                summary,
                published,
                source: source.to_string(),
            })
        })
        .take(limits.max_entries)
        .collect();

    Ok(items)
}

/// Convert HTML content to plain text
fn html_to_text(html: &str) -> String {
    if !html.contains('<') && !html.contains('&') {
        return html.to_string();
    }
    html2text::from_read(html.as_bytes(), 10_000).unwrap_or_else(|_| html.to_string())
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const RSS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Markets</title>
    <link>https://example.com</link>
    <description>Test</description>
    <item>
      <title>Chip stocks rally</title>
      <link>https://example.com/1</link>
      <description>&lt;p&gt;Semiconductor shares &lt;b&gt;jumped&lt;/b&gt; today&lt;/p&gt;</description>
      <pubDate>Tue, 10 Jun 2025 08:00:00 GMT</pubDate>
    </item>
    <item>
      <title>   </title>
      <description>No title here</description>
    </item>
    <item>
      <title>Second</title>
      <description>Plain summary that is rather long for the budget</description>
    </item>
    <item>
      <title>Third</title>
    </item>
    <item>
      <title>Fourth</title>
    </item>
  </channel>
</rss>"#;

    fn limits(max_entries: usize) -> EntryLimits {
        EntryLimits {
            max_entries,
            summary_chars: 20,
        }
    }

    #[test]
    fn test_caps_entries() {
        let items = parse_feed(RSS.as_bytes(), "Markets", limits(3)).unwrap();
        let titles: Vec<_> = items.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["Chip stocks rally", "Second", "Third"]);
    }

    #[test]
    fn test_summary_is_plain_and_bounded() {
        let items = parse_feed(RSS.as_bytes(), "Markets", limits(5)).unwrap();
        assert!(!items[0].summary.contains('<'));
        assert!(items[0].summary.starts_with("Semiconductor"));
        assert!(items[0].summary.chars().count() <= 20);
        assert_eq!(items[1].summary, "Plain summary that i");
        assert_eq!(items[2].summary, "");
    }

    #[test]
    fn test_item_metadata() {
        let items = parse_feed(RSS.as_bytes(), "Markets", limits(1)).unwrap();
        assert_eq!(items[0].link.as_deref(), Some("https://example.com/1"));
        assert_eq!(items[0].source, "Markets");
        assert!(items[0].published.as_deref().unwrap().starts_with("2025-06-10T08:00:00"));
    }

    #[test]
    fn test_garbage_is_parse_error() {
        let err = parse_feed(b"<html>not a feed", "X", limits(3)).unwrap_err();
        assert!(matches!(err, Error::FeedParse(_)));
    }
}
