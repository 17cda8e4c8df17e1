use std::path::Path;

use anyhow::{bail, Result};

use newsbell_core::feed::{opml::parse_opml_file, NewsSources};

pub fn run(sources_path: &Path, opml_path: &Path) -> Result<()> {
    if !opml_path.exists() {
        bail!("File not found: {}", opml_path.display());
    }

    let feeds = parse_opml_file(opml_path)?;
    println!("Found {} feeds in OPML file", feeds.len());

    if feeds.is_empty() {
        return Ok(());
    }

    let mut sources = if sources_path.exists() {
        NewsSources::load(sources_path)?
    } else {
        NewsSources::from_json(r#"{"rss_feeds": []}"#)?
    };

    let total = feeds.len();
    let added = sources.merge_opml(feeds);
    sources.save(sources_path)?;

    println!("\nImport complete:");
    println!("  Added: {}", added);
    println!("  Skipped (already configured): {}", total - added);
    println!("  Written to {}", sources_path.display());

    Ok(())
}
