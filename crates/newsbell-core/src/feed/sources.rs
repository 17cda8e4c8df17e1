use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::opml::OpmlFeed;
use crate::config::FilterSettings;
use crate::filter::FilterConfig;
use crate::{Error, Result};

/// A configured syndication feed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub name: String,
    pub url: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

/// Contents of the sources file (`news_sources.json`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsSources {
    pub rss_feeds: Vec<Source>,
    /// Keyword lists keyed by category name, in file order
    #[serde(default)]
    pub filters: IndexMap<String, Vec<String>>,
    /// Keys this program does not use, kept so `save` writes them back
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl NewsSources {
    /// Load and validate the sources file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Cannot read sources file {}: {}", path.display(), e))
        })?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content)
            .map_err(|e| Error::Config(format!("Invalid sources file: {}", e)))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content + "\n")?;
        Ok(())
    }

    /// Enabled sources in file order
    pub fn enabled_sources(&self) -> impl Iterator<Item = &Source> {
        self.rss_feeds.iter().filter(|s| s.enabled)
    }

    /// Build the keyword rules from the configured include and block categories
    pub fn filter_config(&self, settings: &FilterSettings) -> FilterConfig {
        for category in self.filters.keys() {
            let known = settings.include_categories.contains(category)
                || settings.block_categories.contains(category);
            if !known {
                tracing::debug!("Ignoring unknown filter category '{}'", category);
            }
        }

        let gather = |categories: &[String]| -> Vec<String> {
            categories
                .iter()
                .filter_map(|c| self.filters.get(c))
                .flatten()
                .cloned()
                .collect()
        };

        FilterConfig::new(
            gather(&settings.include_categories),
            gather(&settings.block_categories),
        )
    }

    /// Append OPML feeds whose URL is not configured yet; returns how many were added
    pub fn merge_opml(&mut self, feeds: Vec<OpmlFeed>) -> usize {
        let mut added = 0;
        for feed in feeds {
            if self.rss_feeds.iter().any(|s| s.url == feed.url) {
                tracing::debug!("Skipping already configured feed {}", feed.url);
                continue;
            }
            self.rss_feeds.push(Source {
                name: feed.name,
                url: feed.url,
                enabled: true,
            });
            added += 1;
        }
        added
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "rss_feeds": [
            {"name": "Wire", "url": "https://example.com/wire.xml", "enabled": true},
            {"name": "Old", "url": "https://example.com/old.xml", "enabled": false},
            {"name": "Markets", "url": "https://example.com/markets.xml"}
        ],
        "filters": {
            "关注行业": ["半导体", "chip"],
            "关注关键词": ["stock"],
            "屏蔽词": ["广告"],
            "notes": ["ignored"]
        },
        "version": 2
    }"#;

    #[test]
    fn test_enabled_sources_keep_order() {
        let sources = NewsSources::from_json(SAMPLE).unwrap();
        let names: Vec<_> = sources.enabled_sources().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Wire", "Markets"]);
    }

    #[test]
    fn test_filter_config_from_categories() {
        let sources = NewsSources::from_json(SAMPLE).unwrap();
        let config = sources.filter_config(&FilterSettings::default());
        assert_eq!(config.include_keywords(), ["半导体", "chip", "stock"]);
        assert_eq!(config.block_keywords(), ["广告"]);
    }

    #[test]
    fn test_missing_filters_is_passthrough() {
        let sources =
            NewsSources::from_json(r#"{"rss_feeds": [{"name": "A", "url": "https://a"}]}"#)
                .unwrap();
        let config = sources.filter_config(&FilterSettings::default());
        assert!(config.include_keywords().is_empty());
    }

    #[test]
    fn test_missing_rss_feeds_is_config_error() {
        let err = NewsSources::from_json(r#"{"filters": {}}"#).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let err = NewsSources::load(Path::new("/nonexistent/news_sources.json")).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_merge_opml_skips_known_urls() {
        let mut sources = NewsSources::from_json(SAMPLE).unwrap();
        let added = sources.merge_opml(vec![
            OpmlFeed {
                url: "https://example.com/wire.xml".to_string(),
                name: "Wire again".to_string(),
            },
            OpmlFeed {
                url: "https://example.com/new.xml".to_string(),
                name: "New".to_string(),
            },
        ]);
        assert_eq!(added, 1);
        assert_eq!(sources.rss_feeds.len(), 4);
        assert!(sources.rss_feeds[3].enabled);
    }

    #[test]
    fn test_save_keeps_category_order() {
        let mut sources = NewsSources::from_json(SAMPLE).unwrap();
        sources.merge_opml(vec![OpmlFeed {
            url: "https://example.com/new.xml".to_string(),
            name: "New".to_string(),
        }]);

        let path = std::env::temp_dir().join(format!(
            "newsbell-order-{}.json",
            std::process::id()
        ));
        sources.save(&path).unwrap();
        let saved = NewsSources::load(&path).unwrap();
        std::fs::remove_file(&path).ok();

        let categories: Vec<_> = saved.filters.keys().map(String::as_str).collect();
        assert_eq!(categories, vec!["关注行业", "关注关键词", "屏蔽词", "notes"]);
    }

    #[test]
    fn test_unknown_keys_survive_round_trip() {
        let sources = NewsSources::from_json(SAMPLE).unwrap();
        let json = serde_json::to_string(&sources).unwrap();
        assert!(json.contains("\"version\":2"));
    }
}
