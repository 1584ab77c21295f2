//! Site extraction plugins.
//!
//! A plugin turns a third-party page into something the download manager can
//! use: a syndication feed, an article, or a downloadable enclosure. Every
//! plugin runs under the same request lifecycle regardless of how it scrapes.
//!
//! # Architecture
//!
//! ```text
//! PluginRegistry → PluginInstance (one in-flight request) → ExtractionPlugin → PageFetcher
//!                         │
//!                         └── PluginEvent::{Finished, Error} on an mpsc channel
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use rillet::plugins::{HttpPageFetcher, PluginEvent, PluginRegistry, PluginSettings};
//!
//! let registry = PluginRegistry::builtin()?;
//! let fetcher = Arc::new(HttpPageFetcher::new()?);
//! let (instance, mut events) = registry.instance("rapidvideo", fetcher)?;
//!
//! instance.get_enclosure(url, PluginSettings::new().with("format", "720"));
//! match events.recv().await {
//!     Some(PluginEvent::Finished(result)) => { /* ... */ }
//!     Some(PluginEvent::Error(e)) => { /* ... */ }
//!     None => {}
//! }
//! ```

mod feed;
mod fetch;
mod instance;
mod registry;
mod select;
mod settings;
pub mod sites;

pub use feed::{EntryPreview, FeedDocument, FeedPreview};
pub use fetch::{HttpPageFetcher, PageFetcher, PageRequest};
pub use instance::{Operation, PluginEvent, PluginInstance, RequestStatus};
pub use registry::PluginRegistry;
pub use select::{select_variant, MediaSource};
pub use settings::{PluginSettings, SettingKind, SettingSpec};

use std::fmt;

use async_trait::async_trait;
use regex::Regex;
use thiserror::Error;

/// Video quality tiers from best to worst.
pub const VIDEO_TIERS: &[&str] = &["2160", "1080", "720", "480", "380", "360", "240", "144"];

#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("No {0} specified")]
    MissingSetting(&'static str),

    #[error("Could not find {0} in page")]
    NoMatch(&'static str),

    #[error("{0}")]
    NoContent(String),

    #[error("Plugin {plugin} does not support {capability}")]
    Unsupported {
        plugin: String,
        capability: Capability,
    },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected status {0} from {1}")]
    Status(u16, String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Invalid header {0}")]
    InvalidHeader(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    Feeds,
    Articles,
    Enclosures,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Capability::Feeds => "feeds",
            Capability::Articles => "articles",
            Capability::Enclosures => "enclosures",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Capabilities {
    pub feeds: bool,
    pub articles: bool,
    pub enclosures: bool,
}

impl Capabilities {
    pub fn supports(&self, capability: Capability) -> bool {
        match capability {
            Capability::Feeds => self.feeds,
            Capability::Articles => self.articles,
            Capability::Enclosures => self.enclosures,
        }
    }
}

/// Static description of a plugin: what it can do and which URLs it handles.
#[derive(Debug, Clone)]
pub struct PluginDescriptor {
    pub id: &'static str,
    pub display_name: &'static str,
    pub capabilities: Capabilities,
    pub article_pattern: Option<Regex>,
    pub enclosure_pattern: Option<Regex>,
    pub feed_settings: Vec<SettingSpec>,
    pub article_settings: Vec<SettingSpec>,
    pub enclosure_settings: Vec<SettingSpec>,
}

impl PluginDescriptor {
    pub fn new(id: &'static str, display_name: &'static str) -> Self {
        Self {
            id,
            display_name,
            capabilities: Capabilities::default(),
            article_pattern: None,
            enclosure_pattern: None,
            feed_settings: Vec::new(),
            article_settings: Vec::new(),
            enclosure_settings: Vec::new(),
        }
    }

    pub fn supports(&self, capability: Capability) -> bool {
        self.capabilities.supports(capability)
    }

    /// True when the enclosure pattern matches `url` from its first character.
    pub fn handles_enclosure(&self, url: &str) -> bool {
        self.supports(Capability::Enclosures) && matches_at_start(self.enclosure_pattern.as_ref(), url)
    }

    pub fn handles_article(&self, url: &str) -> bool {
        self.supports(Capability::Articles) && matches_at_start(self.article_pattern.as_ref(), url)
    }

    pub fn settings_for(&self, capability: Capability) -> &[SettingSpec] {
        match capability {
            Capability::Feeds => &self.feed_settings,
            Capability::Articles => &self.article_settings,
            Capability::Enclosures => &self.enclosure_settings,
        }
    }
}

fn matches_at_start(pattern: Option<&Regex>, url: &str) -> bool {
    pattern
        .and_then(|re| re.find(url))
        .is_some_and(|m| m.start() == 0)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleResult {
    pub title: String,
    pub body: String,
    pub url: String,
}

/// Follow-up request that downloads the media itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaRequest {
    pub url: String,
    pub method: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
}

impl MediaRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method: "GET".to_string(),
            headers: Vec::new(),
            body: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnclosureResult {
    pub file_name: String,
    pub request: MediaRequest,
}

impl EnclosureResult {
    pub fn new(file_name: impl Into<String>, request: MediaRequest) -> Self {
        Self {
            file_name: file_name.into(),
            request,
        }
    }
}

/// What a finished request produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    Feed(FeedDocument),
    Article(ArticleResult),
    Enclosure(EnclosureResult),
}

/// A site-specific extraction strategy.
///
/// Implement only the operations the descriptor declares; the rest report
/// [`ExtractionError::Unsupported`]. Implementations perform the whole
/// request and return once; cancellation is handled by [`PluginInstance`].
#[async_trait]
pub trait ExtractionPlugin: Send + Sync {
    fn descriptor(&self) -> &PluginDescriptor;

    async fn fetch_feed(
        &self,
        _fetcher: &dyn PageFetcher,
        _settings: &PluginSettings,
    ) -> Result<FeedDocument, ExtractionError> {
        Err(self.unsupported(Capability::Feeds))
    }

    async fn fetch_article(
        &self,
        _fetcher: &dyn PageFetcher,
        _url: &str,
        _settings: &PluginSettings,
    ) -> Result<ArticleResult, ExtractionError> {
        Err(self.unsupported(Capability::Articles))
    }

    async fn fetch_enclosure(
        &self,
        _fetcher: &dyn PageFetcher,
        _url: &str,
        _settings: &PluginSettings,
    ) -> Result<EnclosureResult, ExtractionError> {
        Err(self.unsupported(Capability::Enclosures))
    }

    fn unsupported(&self, capability: Capability) -> ExtractionError {
        ExtractionError::Unsupported {
            plugin: self.descriptor().id.to_string(),
            capability,
        }
    }
}

/// Last path segment of a URL, used as a download file name.
pub fn file_name_from_url(url: &str) -> String {
    let trimmed = url.split(['?', '#']).next().unwrap_or(url);
    trimmed
        .rsplit('/')
        .next()
        .unwrap_or(trimmed)
        .to_string()
}
