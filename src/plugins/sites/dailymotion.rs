use async_trait::async_trait;
use regex::Regex;
use serde::Deserialize;
use std::collections::HashMap;

use crate::plugins::sites::{capture, WGET_USER_AGENT};
use crate::plugins::{
    select_variant, EnclosureResult, ExtractionError, ExtractionPlugin, FeedDocument,
    MediaRequest, MediaSource, PageFetcher, PageRequest, PluginDescriptor, PluginSettings,
    SettingSpec,
};

const RSS_URL: &str = "http://www.dailymotion.com/rss/videos/";
const VIDEO_COOKIE: &str = "ff=off";
const VIDEO_FORMATS: &[&str] = &["2160", "1080", "720", "480", "380", "240", "144"];

#[derive(Debug, Deserialize)]
struct PlayerConfig {
    metadata: Metadata,
}

#[derive(Debug, Deserialize)]
struct Metadata {
    title: String,
    #[serde(default)]
    qualities: HashMap<String, Vec<Stream>>,
}

#[derive(Debug, Deserialize)]
struct Stream {
    #[serde(rename = "type", default)]
    mime_type: String,
    url: String,
}

pub struct Dailymotion {
    descriptor: PluginDescriptor,
    config: Regex,
}

impl Dailymotion {
    pub fn new() -> Result<Self, regex::Error> {
        let mut descriptor = PluginDescriptor::new("dailymotion", "Dailymotion");
        descriptor.capabilities.feeds = true;
        descriptor.capabilities.enclosures = true;
        descriptor.enclosure_pattern =
            Some(Regex::new(r"^https?://(www\.)?dailymotion\.com/video/\w+")?);
        descriptor.feed_settings = vec![
            SettingSpec::list(
                "type",
                "Feed type",
                vec![("Channel", "channel"), ("Search", "search")],
                "search",
            ),
            SettingSpec::text("query", "Channel name / search query"),
        ];
        descriptor.enclosure_settings = vec![SettingSpec::list(
            "videoFormat",
            "Video format",
            vec![
                ("4K", "2160"),
                ("1080p", "1080"),
                ("720p", "720"),
                ("480p", "480"),
                ("380p", "380"),
                ("240p", "240"),
                ("144p", "144"),
            ],
            "1080",
        )];

        Ok(Self {
            descriptor,
            config: Regex::new(r"var config = (\{.+\});\n")?,
        })
    }

    fn feed_url(settings: &PluginSettings) -> Result<String, ExtractionError> {
        let query = settings
            .text("query")
            .ok_or(ExtractionError::MissingSetting("query"))?;

        let mut url = RSS_URL.to_string();
        if settings.text("type").as_deref() == Some("search") {
            url.push_str("search/");
        }
        url.push_str(&query.split_whitespace().collect::<Vec<_>>().join("+"));
        Ok(url)
    }
}

#[async_trait]
impl ExtractionPlugin for Dailymotion {
    fn descriptor(&self) -> &PluginDescriptor {
        &self.descriptor
    }

    async fn fetch_feed(
        &self,
        fetcher: &dyn PageFetcher,
        settings: &PluginSettings,
    ) -> Result<FeedDocument, ExtractionError> {
        let url = Self::feed_url(settings)?;
        let request = PageRequest::get(url).header("User-Agent", WGET_USER_AGENT);
        Ok(FeedDocument(fetcher.fetch_text(&request).await?))
    }

    async fn fetch_enclosure(
        &self,
        fetcher: &dyn PageFetcher,
        url: &str,
        settings: &PluginSettings,
    ) -> Result<EnclosureResult, ExtractionError> {
        let request = PageRequest::get(url)
            .header("User-Agent", WGET_USER_AGENT)
            .header("Cookie", VIDEO_COOKIE);
        let page = fetcher.fetch_text(&request).await?;

        let config: PlayerConfig = serde_json::from_str(&capture(&self.config, &page, "player config")?)?;
        let metadata = config.metadata;

        // Flatten mp4 streams in tier order so the first candidate is the best one.
        let sources: Vec<MediaSource> = VIDEO_FORMATS
            .iter()
            .filter_map(|tier| {
                metadata
                    .qualities
                    .get(*tier)?
                    .iter()
                    .find(|s| s.mime_type == "video/mp4")
                    .map(|s| MediaSource::new(*tier, s.url.clone()))
            })
            .collect();

        let format = settings.text("videoFormat");
        let chosen = select_variant(&sources, format.as_deref(), VIDEO_FORMATS)
            .ok_or_else(|| ExtractionError::NoContent("No video streams found".to_string()))?;

        Ok(EnclosureResult::new(
            format!("{}.mp4", metadata.title),
            MediaRequest::get(chosen.url.clone()),
        ))
    }
}
