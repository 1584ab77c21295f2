use async_trait::async_trait;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::plugins::sites::capture;
use crate::plugins::{
    select_variant, EnclosureResult, ExtractionError, ExtractionPlugin, MediaRequest, MediaSource,
    PageFetcher, PageRequest, PluginDescriptor, PluginSettings, SettingSpec, VIDEO_TIERS,
};

const DEFAULT_FORMAT: &str = "1080";

#[derive(Debug, Deserialize)]
struct Source {
    #[serde(default)]
    res: Value,
    file: String,
}

impl Source {
    fn into_media(self) -> MediaSource {
        let variant = match self.res {
            Value::String(s) => s,
            Value::Null => String::new(),
            other => other.to_string(),
        };
        MediaSource::new(variant, self.file)
    }
}

pub struct Rapidvideo {
    descriptor: PluginDescriptor,
    title: Regex,
    sources: Regex,
    source_tag: Regex,
}

impl Rapidvideo {
    pub fn new() -> Result<Self, regex::Error> {
        let mut descriptor = PluginDescriptor::new("rapidvideo", "RapidVideo");
        descriptor.capabilities.enclosures = true;
        descriptor.enclosure_pattern = Some(Regex::new(r"^https?://(www\.)?rapidvideo\.com/(e|v)/\w+")?);
        descriptor.enclosure_settings = vec![SettingSpec::list(
            "format",
            "Video format",
            vec![("1080p", "1080"), ("720p", "720"), ("480p", "480"), ("360p", "360")],
            DEFAULT_FORMAT,
        )];

        Ok(Self {
            descriptor,
            title: Regex::new(r#""og:title" content="([^"]+)"#)?,
            sources: Regex::new(r#""sources": (\[[^\]]+\])"#)?,
            source_tag: Regex::new(r#"<source src="([^"]+)"#)?,
        })
    }

    /// The `"sources"` array, or `None` when it is missing or not valid JSON.
    fn embedded_sources(&self, page: &str) -> Option<Vec<MediaSource>> {
        let json = capture(&self.sources, page, "sources").ok()?;
        let sources: Vec<Source> = serde_json::from_str(&json).ok()?;
        Some(sources.into_iter().map(Source::into_media).collect())
    }
}

#[async_trait]
impl ExtractionPlugin for Rapidvideo {
    fn descriptor(&self) -> &PluginDescriptor {
        &self.descriptor
    }

    async fn fetch_enclosure(
        &self,
        fetcher: &dyn PageFetcher,
        url: &str,
        settings: &PluginSettings,
    ) -> Result<EnclosureResult, ExtractionError> {
        let page = fetcher.fetch_text(&PageRequest::get(url)).await?;
        let file_name = capture(&self.title, &page, "video title")?;

        let video_url = match self.embedded_sources(&page) {
            Some(sources) => {
                let format = settings.text("format").unwrap_or_else(|| DEFAULT_FORMAT.to_string());
                let chosen = select_variant(&sources, Some(&format), VIDEO_TIERS)
                    .ok_or_else(|| ExtractionError::NoContent("No video formats found".to_string()))?;
                debug!("rapidvideo: chose {:?} for format {}", chosen.variant, format);
                chosen.url.clone()
            }
            None => capture(&self.source_tag, &page, "video source")?,
        };

        Ok(EnclosureResult::new(file_name, MediaRequest::get(video_url)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugins::sites::testing::StubFetcher;

    const URL: &str = "https://www.rapidvideo.com/v/ABC123";

    fn page(sources: &str) -> String {
        format!(
            r#"<html><head><meta property="og:title" content="Holiday.mp4"></head>
<script>jwplayer().setup({{"sources": {}, "autostart": false}});</script></html>"#,
            sources
        )
    }

    async fn enclosure(body: &str, settings: PluginSettings) -> Result<EnclosureResult, ExtractionError> {
        let fetcher = StubFetcher::new().page(URL, body);
        Rapidvideo::new()
            .unwrap()
            .fetch_enclosure(&fetcher, URL, &settings)
            .await
    }

    #[tokio::test]
    async fn test_requested_format_selected() {
        let body = page(r#"[{"res":"1080","file":"a.mp4"},{"res":"480","file":"b.mp4"}]"#);
        let result = enclosure(&body, PluginSettings::new().with("format", "480"))
            .await
            .unwrap();

        assert_eq!(result.file_name, "Holiday.mp4");
        assert_eq!(result.request.url, "b.mp4");
        assert_eq!(result.request.method, "GET");
    }

    #[tokio::test]
    async fn test_missing_format_falls_back() {
        let body = page(r#"[{"res":1080,"file":"a.mp4"},{"res":480,"file":"b.mp4"}]"#);

        let result = enclosure(&body, PluginSettings::new().with("format", "2160"))
            .await
            .unwrap();
        assert_eq!(result.request.url, "a.mp4");

        let result = enclosure(&body, PluginSettings::new()).await.unwrap();
        assert_eq!(result.request.url, "a.mp4");
    }

    #[tokio::test]
    async fn test_empty_sources_fail() {
        let err = enclosure(&page("[ ]"), PluginSettings::new()).await.unwrap_err();
        assert_eq!(err.to_string(), "No video formats found");
    }

    #[tokio::test]
    async fn test_source_tag_fallback() {
        let body = r#"<meta property="og:title" content="Clip">
<video><source src="https://cdn.example.com/clip.mp4" type="video/mp4"></video>"#;
        let result = enclosure(body, PluginSettings::new()).await.unwrap();
        assert_eq!(result.request.url, "https://cdn.example.com/clip.mp4");
    }

    #[tokio::test]
    async fn test_missing_title_is_no_match() {
        let err = enclosure("<html></html>", PluginSettings::new()).await.unwrap_err();
        assert!(matches!(err, ExtractionError::NoMatch("video title")));
    }

    #[test]
    fn test_enclosure_pattern() {
        let plugin = Rapidvideo::new().unwrap();
        assert!(plugin.descriptor().handles_enclosure(URL));
        assert!(plugin.descriptor().handles_enclosure("http://rapidvideo.com/e/FOO"));
        assert!(!plugin.descriptor().handles_enclosure("https://example.com/v/ABC123"));
    }
}
