use async_trait::async_trait;
use regex::Regex;

use crate::plugins::sites::{capture, WGET_USER_AGENT};
use crate::plugins::{
    file_name_from_url, ArticleResult, EnclosureResult, ExtractionError, ExtractionPlugin,
    MediaRequest, PageFetcher, PageRequest, PluginDescriptor, PluginSettings,
};

pub struct Picstate {
    descriptor: PluginDescriptor,
    image: Regex,
}

impl Picstate {
    pub fn new() -> Result<Self, regex::Error> {
        let page = r"^https?://(www\.)?picstate\.com/view/";

        let mut descriptor = PluginDescriptor::new("picstate", "Picstate");
        descriptor.capabilities.articles = true;
        descriptor.capabilities.enclosures = true;
        descriptor.article_pattern = Some(Regex::new(page)?);
        descriptor.enclosure_pattern = Some(Regex::new(page)?);

        Ok(Self {
            descriptor,
            image: Regex::new(r#"src="(https?://(www\.)?picstate\.com/files/[^"]+)""#)?,
        })
    }

    async fn image_url(&self, fetcher: &dyn PageFetcher, url: &str) -> Result<String, ExtractionError> {
        let request = PageRequest::get(url).header("User-Agent", WGET_USER_AGENT);
        let page = fetcher.fetch_text(&request).await?;
        capture(&self.image, &page, "image")
    }
}

#[async_trait]
impl ExtractionPlugin for Picstate {
    fn descriptor(&self) -> &PluginDescriptor {
        &self.descriptor
    }

    async fn fetch_article(
        &self,
        fetcher: &dyn PageFetcher,
        url: &str,
        _settings: &PluginSettings,
    ) -> Result<ArticleResult, ExtractionError> {
        let image_url = self.image_url(fetcher, url).await?;

        Ok(ArticleResult {
            title: file_name_from_url(&image_url),
            body: format!("<img src='{}'>", image_url),
            url: url.to_string(),
        })
    }

    async fn fetch_enclosure(
        &self,
        fetcher: &dyn PageFetcher,
        url: &str,
        _settings: &PluginSettings,
    ) -> Result<EnclosureResult, ExtractionError> {
        let image_url = self.image_url(fetcher, url).await?;

        Ok(EnclosureResult::new(
            file_name_from_url(&image_url),
            MediaRequest::get(image_url),
        ))
    }
}
