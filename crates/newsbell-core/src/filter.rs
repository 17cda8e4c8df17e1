//! Keyword filtering and title deduplication.
//!
//! Matching is a case-sensitive substring search over `title + summary`;
//! there is no tokenization or stemming.

use std::collections::HashSet;

use crate::config::FilterSettings;
use crate::feed::NewsItem;

/// Include and block keyword lists for one run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterConfig {
    include_keywords: Vec<String>,
    block_keywords: Vec<String>,
}

impl FilterConfig {
    /// Empty keywords are dropped; duplicates keep their first position
    pub fn new(include: Vec<String>, block: Vec<String>) -> Self {
        Self {
            include_keywords: ordered_set(include),
            block_keywords: ordered_set(block),
        }
    }

    pub fn include_keywords(&self) -> &[String] {
        &self.include_keywords
    }

    pub fn block_keywords(&self) -> &[String] {
        &self.block_keywords
    }

    /// Block rules take precedence over include rules
    pub fn matches(&self, item: &NewsItem) -> bool {
        let text = item.match_text();
        let included = self.include_keywords.iter().any(|kw| text.contains(kw.as_str()));
        included && !self.block_keywords.iter().any(|kw| text.contains(kw.as_str()))
    }
}

fn ordered_set(keywords: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    keywords
        .into_iter()
        .filter(|kw| !kw.is_empty())
        .filter(|kw| seen.insert(kw.clone()))
        .collect()
}

/// Count caps applied by [`filter`]
#[derive(Debug, Clone, Copy)]
pub struct FilterLimits {
    pub passthrough_limit: usize,
    pub max_items: usize,
}

impl From<&FilterSettings> for FilterLimits {
    fn from(settings: &FilterSettings) -> Self {
        Self {
            passthrough_limit: settings.passthrough_limit,
            max_items: settings.max_items,
        }
    }
}

impl Default for FilterLimits {
    fn default() -> Self {
        (&FilterSettings::default()).into()
    }
}

/// Apply keyword rules, drop repeated titles and cap the result
///
/// With no include keywords every unique title passes, capped at
/// `limits.passthrough_limit`.
pub fn filter(items: &[NewsItem], config: &FilterConfig, limits: FilterLimits) -> Vec<NewsItem> {
    if config.include_keywords.is_empty() {
        tracing::info!("No include keywords configured, passing all items through");
        let mut unique = dedupe_by_title(items);
        unique.truncate(limits.passthrough_limit);
        return unique;
    }

    let matched = items.iter().filter(|item| config.matches(item));
    let mut unique = dedupe_by_title(matched);
    unique.truncate(limits.max_items);
    unique
}

/// Keep the first item for each exact title, in input order
pub fn dedupe_by_title<'a>(items: impl IntoIterator<Item = &'a NewsItem>) -> Vec<NewsItem> {
    let mut seen: HashSet<&'a str> = HashSet::new();
    items
        .into_iter()
        .filter(|&item| seen.insert(item.title.as_str()))
        .cloned()
        .collect()
}

/// Un-filtered prefix sent when filtering leaves nothing
pub fn fallback(items: &[NewsItem], limit: usize) -> Vec<NewsItem> {
    items.iter().take(limit).cloned().collect()
}
