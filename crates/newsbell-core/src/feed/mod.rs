mod fetcher;
mod models;
pub mod opml;
mod parser;
mod sources;

pub use fetcher::FeedFetcher;
pub use models::{truncate_chars, FetchBatch, NewsItem};
pub use parser::{parse_feed, EntryLimits};
pub use sources::{NewsSources, Source};
