#![allow(dead_code)]

use std::path::PathBuf;

/// RSS 2.0 document with one item per `(title, description)` pair
pub fn rss(items: &[(&str, &str)]) -> String {
    let mut body = String::from(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0"><channel><title>Test</title><link>https://example.com</link><description>Test feed</description>"#,
    );
    for (i, (title, description)) in items.iter().enumerate() {
        body.push_str(&format!(
            "<item><title>{title}</title><link>https://example.com/{i}</link><description>{description}</description></item>"
        ));
    }
    body.push_str("</channel></rss>");
    body
}

/// Write a sources file under the temp dir and return its path
pub fn write_sources(name: &str, json: &serde_json::Value) -> PathBuf {
    let path = std::env::temp_dir().join(format!(
        "newsbell-{}-{}.json",
        name,
        std::process::id()
    ));
    std::fs::write(&path, serde_json::to_string_pretty(json).unwrap()).unwrap();
    path
}
