use std::path::Path;

use anyhow::Result;

use newsbell_core::{feed::NewsSources, AppConfig};

pub fn run(config: &AppConfig, sources_path: &Path) -> Result<()> {
    let sources = NewsSources::load(sources_path)?;

    if sources.rss_feeds.is_empty() {
        println!("No sources configured in {}.", sources_path.display());
        println!("\nTo add feeds from an OPML export, run:");
        println!("  newsbell import <file.opml>");
        return Ok(());
    }

    let enabled = sources.enabled_sources().count();
    println!(
        "Sources ({} enabled of {}):\n",
        enabled,
        sources.rss_feeds.len()
    );

    for source in &sources.rss_feeds {
        let marker = if source.enabled { "+" } else { "-" };
        println!("  [{}] {}", marker, source.name);
        println!("      URL: {}", source.url);
    }

    let rules = sources.filter_config(&config.filter);
    println!();
    if rules.include_keywords().is_empty() {
        println!(
            "Include keywords: (none, first {} items pass through)",
            config.filter.passthrough_limit
        );
    } else {
        println!("Include keywords: {}", rules.include_keywords().join(", "));
    }
    if !rules.block_keywords().is_empty() {
        println!("Block keywords:   {}", rules.block_keywords().join(", "));
    }

    Ok(())
}
