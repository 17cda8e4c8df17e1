mod ai;
mod plain;

pub use ai::AiFormatter;
pub use plain::PlainFormatter;

use crate::feed::{truncate_chars, NewsItem};
use crate::Result;

/// A strategy that renders the filtered items into a digest
///
/// Failures are returned to the caller, which decides on a fallback.
#[async_trait::async_trait]
pub trait ReportFormatter: Send + Sync {
    fn name(&self) -> &str;

    async fn format(&self, items: &[NewsItem]) -> Result<String>;
}

/// Bound a report to `max_chars` characters, marking the cut with an ellipsis
pub fn truncate_report(report: &str, max_chars: usize) -> String {
    if report.chars().count() <= max_chars {
        return report.to_string();
    }
    if max_chars == 0 {
        return String::new();
    }
    let mut cut = truncate_chars(report, max_chars - 1).trim_end().to_string();
    cut.push('…');
    cut
}
