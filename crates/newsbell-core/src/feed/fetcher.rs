use std::time::Duration;

use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, USER_AGENT};
use reqwest::Client;
use url::Url;

use super::models::{FetchBatch, NewsItem};
use super::parser::{parse_feed, EntryLimits};
use super::sources::Source;
use crate::config::FetchConfig;
use crate::{Error, Result};

const DEFAULT_USER_AGENT: &str = concat!(
    "Mozilla/5.0 (compatible; newsbell/",
    env!("CARGO_PKG_VERSION"),
    "; +https://github.com/newsbell)"
);

/// Feed fetcher: one GET per source, no retries
pub struct FeedFetcher {
    client: Client,
    limits: EntryLimits,
    max_feed_bytes: usize,
}

impl FeedFetcher {
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(Self::build_headers())
            .gzip(true)
            .deflate(true)
            .brotli(true)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()?;

        Ok(Self {
            client,
            limits: EntryLimits {
                max_entries: config.per_source_limit,
                summary_chars: config.summary_chars,
            },
            max_feed_bytes: config.max_feed_bytes,
        })
    }

    fn build_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static(
                "application/rss+xml,application/atom+xml,application/xml;q=0.9,text/xml;q=0.8,*/*;q=0.5",
            ),
        );
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_static("zh-CN,zh;q=0.9,en-US;q=0.8,en;q=0.7"),
        );
        headers.insert(USER_AGENT, HeaderValue::from_static(DEFAULT_USER_AGENT));
        headers
    }

    async fn fetch_body(&self, url: &str) -> Result<Bytes> {
        let response = self.client.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(Error::FeedParse(format!("HTTP {} for URL: {}", status, url)));
        }

        if let Some(len) = response.content_length() {
            self.ensure_content_size(len as usize, url)?;
        }

        let body = response.bytes().await?;
        self.ensure_content_size(body.len(), url)?;
        Ok(body)
    }

    /// Fetch a single feed and return its first entries
    pub async fn fetch(&self, url: &str, source_name: &str) -> Result<Vec<NewsItem>> {
        Url::parse(url)?;

        tracing::debug!("Fetching feed from: {}", url);

        let body = self.fetch_body(url).await?;
        parse_feed(&body, source_name, self.limits)
    }

    /// Fetch every enabled source in order; a failing source contributes nothing
    pub async fn collect<'a>(&self, sources: impl IntoIterator<Item = &'a Source>) -> FetchBatch {
        let mut batch = FetchBatch::default();

        for source in sources {
            if !source.enabled {
                continue;
            }

            match self.fetch(&source.url, &source.name).await {
                Ok(items) if !items.is_empty() => {
                    tracing::info!("Source '{}': {} items", source.name, items.len());
                    batch.succeeded += 1;
                    batch.items.extend(items);
                }
                Ok(_) => {
                    tracing::warn!("Source '{}': feed has no entries", source.name);
                    batch.failed += 1;
                }
                Err(e) => {
                    tracing::warn!("Failed to fetch source '{}': {}", source.name, e);
                    batch.failed += 1;
                }
            }
        }

        tracing::info!(
            "Fetched {} items from {} sources ({} failed)",
            batch.items.len(),
            batch.succeeded,
            batch.failed
        );

        batch
    }

    fn ensure_content_size(&self, size: usize, url: &str) -> Result<()> {
        if size > self.max_feed_bytes {
            return Err(Error::FeedParse(format!(
                "Feed too large ({} bytes) for URL: {}",
                size, url
            )));
        }
        Ok(())
    }
}
