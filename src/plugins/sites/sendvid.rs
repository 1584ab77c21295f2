use async_trait::async_trait;
use regex::Regex;

use crate::plugins::sites::{meta_content, WGET_USER_AGENT};
use crate::plugins::{
    file_name_from_url, EnclosureResult, ExtractionError, ExtractionPlugin, MediaRequest,
    PageFetcher, PageRequest, PluginDescriptor, PluginSettings,
};

pub struct Sendvid {
    descriptor: PluginDescriptor,
}

impl Sendvid {
    pub fn new() -> Result<Self, regex::Error> {
        let mut descriptor = PluginDescriptor::new("sendvid", "Sendvid");
        descriptor.capabilities.enclosures = true;
        descriptor.enclosure_pattern = Some(Regex::new(r"^https?://(\w+\.)?sendvid\.com/")?);

        Ok(Self { descriptor })
    }
}

#[async_trait]
impl ExtractionPlugin for Sendvid {
    fn descriptor(&self) -> &PluginDescriptor {
        &self.descriptor
    }

    async fn fetch_enclosure(
        &self,
        fetcher: &dyn PageFetcher,
        url: &str,
        _settings: &PluginSettings,
    ) -> Result<EnclosureResult, ExtractionError> {
        // Direct media links need no page lookup.
        if url.ends_with(".mp4") {
            return Ok(EnclosureResult::new(file_name_from_url(url), MediaRequest::get(url)));
        }

        let request = PageRequest::get(url).header("User-Agent", WGET_USER_AGENT);
        let page = fetcher.fetch_text(&request).await?;

        let file_name = meta_content(&page, "og:title").ok_or(ExtractionError::NoMatch("video title"))?;
        let video_url = meta_content(&page, "og:video").ok_or(ExtractionError::NoMatch("video url"))?;

        Ok(EnclosureResult::new(file_name, MediaRequest::get(video_url)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugins::sites::testing::StubFetcher;

    #[tokio::test]
    async fn test_direct_mp4_resolves_without_network() {
        let fetcher = StubFetcher::new();
        let url = "https://videos2.sendvid.com/ab/cd/clip.mp4";

        let result = Sendvid::new()
            .unwrap()
            .fetch_enclosure(&fetcher, url, &PluginSettings::new())
            .await
            .unwrap();

        assert_eq!(result.file_name, "clip.mp4");
        assert_eq!(result.request.url, url);
        assert!(fetcher.requests().is_empty());
    }

    #[tokio::test]
    async fn test_page_meta_tags() {
        let url = "https://sendvid.com/abc123";
        let fetcher = StubFetcher::new().page(
            url,
            r#"<meta property="og:title" content="beach.mp4"/><meta property="og:video" content="https://videos2.sendvid.com/x/beach.mp4"/>"#,
        );

        let result = Sendvid::new()
            .unwrap()
            .fetch_enclosure(&fetcher, url, &PluginSettings::new())
            .await
            .unwrap();

        assert_eq!(result.file_name, "beach.mp4");
        assert_eq!(result.request.url, "https://videos2.sendvid.com/x/beach.mp4");
    }

    #[tokio::test]
    async fn test_page_without_video_fails() {
        let url = "https://sendvid.com/gone";
        let fetcher = StubFetcher::new().page(url, r#"<meta property="og:title" content="x"/>"#);

        let err = Sendvid::new()
            .unwrap()
            .fetch_enclosure(&fetcher, url, &PluginSettings::new())
            .await
            .unwrap_err();
        assert!(matches!(err, ExtractionError::NoMatch("video url")));
    }
}
