use std::path::PathBuf;

use tracing::{info, warn};

use crate::ai::Summarizer;
use crate::config::AppConfig;
use crate::feed::{FeedFetcher, NewsItem, NewsSources};
use crate::filter::{fallback, filter};
use crate::notify::{DispatchReport, Dispatcher};
use crate::report::{truncate_report, AiFormatter, PlainFormatter, ReportFormatter};
use crate::Result;

/// Switches for a single run
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Build the report but do not push it
    pub dry_run: bool,
    /// Never call the text-generation API
    pub plain_only: bool,
}

/// Statistics and artifacts of a completed run
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub report: String,
    pub fetched: usize,
    pub sources_ok: usize,
    pub sources_failed: usize,
    pub kept: usize,
    pub used_fallback: bool,
    /// Formatter that produced the report
    pub formatter: String,
    /// `None` when nothing was pushed (dry run or no channel configured)
    pub dispatch: Option<DispatchReport>,
}

#[derive(Debug, Clone)]
pub enum RunOutcome {
    /// Every source failed or was empty; nothing was pushed
    NothingFetched { sources_failed: usize },
    Completed(RunSummary),
}

/// One fetch → filter → format → push pass
pub struct Pipeline {
    config: AppConfig,
    sources_path: PathBuf,
    options: RunOptions,
}

impl Pipeline {
    pub fn new(config: AppConfig, sources_path: impl Into<PathBuf>) -> Self {
        Self {
            config,
            sources_path: sources_path.into(),
            options: RunOptions::default(),
        }
    }

    pub fn with_options(mut self, options: RunOptions) -> Self {
        self.options = options;
        self
    }

    /// Run once. Only a configuration problem is returned as an error
    pub async fn run(&self) -> Result<RunOutcome> {
        let sources = NewsSources::load(&self.sources_path)?;
        info!(
            "Loaded {} sources from {}",
            sources.rss_feeds.len(),
            self.sources_path.display()
        );

        let dispatcher = self.build_dispatcher();
        let fetcher = FeedFetcher::new(&self.config.fetch)?;
        let batch = fetcher.collect(sources.enabled_sources()).await;

        if batch.is_empty() {
            warn!("No news fetched from any source, nothing to push");
            return Ok(RunOutcome::NothingFetched {
                sources_failed: batch.failed,
            });
        }

        let rules = sources.filter_config(&self.config.filter);
        let mut kept = filter(&batch.items, &rules, (&self.config.filter).into());
        info!("{} of {} items kept after filtering", kept.len(), batch.items.len());

        let used_fallback = kept.is_empty();
        if used_fallback {
            kept = fallback(&batch.items, self.config.filter.fallback_items);
            info!("No item matched the filters, sending the latest {} instead", kept.len());
        }

        let (report, formatter) = self.format_report(&kept).await;
        let report = truncate_report(&report, self.config.report.max_chars);
        info!("Report ready: {} chars via {}", report.chars().count(), formatter);

        let dispatch = match dispatcher {
            Some(dispatcher) => Some(dispatcher.dispatch(&self.config.report.title, &report).await),
            None => None,
        };

        Ok(RunOutcome::Completed(RunSummary {
            report,
            fetched: batch.items.len(),
            sources_ok: batch.succeeded,
            sources_failed: batch.failed,
            kept: kept.len(),
            used_fallback,
            formatter,
            dispatch,
        }))
    }

    /// Channels for this run; `None` skips the push step
    fn build_dispatcher(&self) -> Option<Dispatcher> {
        if self.options.dry_run {
            info!("Dry run, skipping push");
            return None;
        }

        match Dispatcher::from_config(&self.config.push) {
            Ok(dispatcher) if dispatcher.has_channels() => Some(dispatcher),
            Ok(_) => {
                warn!("No push channel configured");
                None
            }
            Err(e) => {
                warn!("Push channels unavailable: {}", e);
                None
            }
        }
    }

    /// Try the preferred formatters in order; the plain list is the last resort
    async fn format_report(&self, items: &[NewsItem]) -> (String, String) {
        let plain = PlainFormatter::new(&self.config.report);

        for formatter in self.preferred_formatters() {
            match formatter.format(items).await {
                Ok(report) => return (report, formatter.name().to_string()),
                Err(e) => warn!(
                    "{} formatter failed, falling back to plain report: {}",
                    formatter.name(),
                    e
                ),
            }
        }

        (plain.render(items), plain.name().to_string())
    }

    fn preferred_formatters(&self) -> Vec<Box<dyn ReportFormatter>> {
        let mut formatters: Vec<Box<dyn ReportFormatter>> = Vec::new();

        if self.options.plain_only || !self.config.ai.enabled {
            return formatters;
        }
        if !self.config.ai.is_active() {
            info!("AI summarization disabled: no API key configured");
            return formatters;
        }

        match Summarizer::new(&self.config.ai) {
            Ok(summarizer) => formatters.push(Box::new(AiFormatter::new(
                summarizer,
                self.config.report.title.clone(),
            ))),
            Err(e) => warn!("AI summarization unavailable: {}", e),
        }

        formatters
    }
}
