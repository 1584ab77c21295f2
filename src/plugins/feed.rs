use feed_rs::parser;
use html_escape::decode_html_entities;

use crate::plugins::ExtractionError;

/// A serialized syndication document produced by a feed plugin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedDocument(pub String);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedPreview {
    pub title: Option<String>,
    pub entries: Vec<EntryPreview>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryPreview {
    pub title: Option<String>,
    pub link: Option<String>,
}

impl FeedDocument {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parse the document as RSS/Atom/JSON Feed and summarise it.
    pub fn parse(&self) -> Result<FeedPreview, ExtractionError> {
        let feed = parser::parse(self.0.as_bytes())
            .map_err(|e| ExtractionError::NoContent(format!("Invalid feed document: {}", e)))?;

        let entries = feed
            .entries
            .into_iter()
            .map(|entry| EntryPreview {
                title: entry
                    .title
                    .map(|t| decode_html_entities(&t.content).to_string()),
                link: entry.links.first().map(|l| l.href.clone()),
            })
            .collect();

        Ok(FeedPreview {
            title: feed
                .title
                .map(|t| decode_html_entities(&t.content).to_string()),
            entries,
        })
    }
}
