use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::{Error, Result};

/// A feed subscription found in an OPML export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpmlFeed {
    pub url: String,
    pub name: String,
}

pub fn parse_opml_file(path: &Path) -> Result<Vec<OpmlFeed>> {
    let content = std::fs::read_to_string(path)?;
    parse_opml(&content)
}

/// Collect every `outline` carrying an `xmlUrl`, at any nesting depth
pub fn parse_opml(content: &str) -> Result<Vec<OpmlFeed>> {
    let mut reader = Reader::from_str(content);
    reader.config_mut().trim_text(true);

    let mut feeds = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Empty(e)) | Ok(Event::Start(e)) if e.name().as_ref() == b"outline" => {
                if let Some(feed) = outline_feed(&e) {
                    feeds.push(feed);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::Config(format!("Failed to parse OPML: {}", e)));
            }
            _ => {}
        }
    }

    Ok(feeds)
}

fn outline_feed(element: &BytesStart<'_>) -> Option<OpmlFeed> {
    let mut url = None;
    let mut title = None;
    let mut text = None;

    for attr in element.attributes().flatten() {
        let value = attr
            .unescape_value()
            .map(|v| v.trim().to_string())
            .unwrap_or_else(|_| String::from_utf8_lossy(&attr.value).trim().to_string());
        match attr.key.as_ref() {
            b"xmlUrl" => url = Some(value),
            b"title" => title = Some(value),
            b"text" => text = Some(value),
            _ => {}
        }
    }

    // Category outlines have no xmlUrl
    let url = url.filter(|u| !u.is_empty())?;
    let name = title
        .filter(|t| !t.is_empty())
        .or(text.filter(|t| !t.is_empty()))
        .unwrap_or_else(|| url.clone());

    Some(OpmlFeed { url, name })
}
