use async_trait::async_trait;
use regex::Regex;

use crate::plugins::sites::WGET_USER_AGENT;
use crate::plugins::{
    file_name_from_url, EnclosureResult, ExtractionError, ExtractionPlugin, MediaRequest,
    PageFetcher, PageRequest, PluginDescriptor, PluginSettings,
};

pub struct Pixroute {
    descriptor: PluginDescriptor,
    image: Regex,
}

impl Pixroute {
    pub fn new() -> Result<Self, regex::Error> {
        let mut descriptor = PluginDescriptor::new("pixroute", "Pixroute");
        descriptor.capabilities.enclosures = true;
        descriptor.enclosure_pattern = Some(Regex::new(r"^https?://(www\.)?pixroute\.com/\w+")?);

        Ok(Self {
            descriptor,
            image: Regex::new(r"https?://img\d+\.pixroute\.com/\w/\d+/\w+\.\w+")?,
        })
    }
}

#[async_trait]
impl ExtractionPlugin for Pixroute {
    fn descriptor(&self) -> &PluginDescriptor {
        &self.descriptor
    }

    async fn fetch_enclosure(
        &self,
        fetcher: &dyn PageFetcher,
        url: &str,
        _settings: &PluginSettings,
    ) -> Result<EnclosureResult, ExtractionError> {
        let request = PageRequest::get(url).header("User-Agent", WGET_USER_AGENT);
        let page = fetcher.fetch_text(&request).await?;

        let image_url = self
            .image
            .find(&page)
            .map(|m| m.as_str().to_string())
            .ok_or(ExtractionError::NoMatch("image"))?;

        Ok(EnclosureResult::new(
            file_name_from_url(&image_url),
            MediaRequest::get(image_url),
        ))
    }
}
