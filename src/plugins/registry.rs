use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::debug;

use crate::app::{Result, RilletError};
use crate::plugins::{sites, ExtractionPlugin, PageFetcher, PluginDescriptor, PluginEvent, PluginInstance};

/// The set of available extraction plugins, ordered by display name.
#[derive(Clone)]
pub struct PluginRegistry {
    plugins: Vec<Arc<dyn ExtractionPlugin>>,
}

impl PluginRegistry {
    pub fn new(mut plugins: Vec<Arc<dyn ExtractionPlugin>>) -> Self {
        plugins.sort_by_key(|p| p.descriptor().display_name.to_lowercase());
        Self { plugins }
    }

    /// Registry of the plugins shipped with this crate.
    pub fn builtin() -> Result<Self> {
        let registry = Self::new(sites::builtin()?);
        debug!("Loaded {} built-in plugins", registry.plugins.len());
        Ok(registry)
    }

    pub fn get(&self, id: &str) -> Option<&Arc<dyn ExtractionPlugin>> {
        self.plugins.iter().find(|p| p.descriptor().id == id)
    }

    /// First plugin whose enclosure pattern matches `url`.
    pub fn for_enclosure(&self, url: &str) -> Option<&Arc<dyn ExtractionPlugin>> {
        self.plugins
            .iter()
            .find(|p| p.descriptor().handles_enclosure(url))
    }

    pub fn for_article(&self, url: &str) -> Option<&Arc<dyn ExtractionPlugin>> {
        self.plugins.iter().find(|p| p.descriptor().handles_article(url))
    }

    pub fn supports_enclosure(&self, url: &str) -> bool {
        self.for_enclosure(url).is_some()
    }

    pub fn descriptors(&self) -> impl Iterator<Item = &PluginDescriptor> {
        self.plugins.iter().map(|p| p.descriptor())
    }

    /// A fresh instance of plugin `id`, with the receiver for its events.
    pub fn instance(
        &self,
        id: &str,
        fetcher: Arc<dyn PageFetcher>,
    ) -> Result<(PluginInstance, mpsc::UnboundedReceiver<PluginEvent>)> {
        let plugin = self
            .get(id)
            .ok_or_else(|| RilletError::PluginNotFound(id.to_string()))?;
        Ok(PluginInstance::new(plugin.clone(), fetcher))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugins::sites::testing::StubFetcher;
    use crate::plugins::{Capability, Extraction, PluginSettings};

    #[test]
    fn test_sorted_by_display_name() {
        let registry = PluginRegistry::builtin().unwrap();
        let names: Vec<_> = registry.descriptors().map(|d| d.display_name).collect();

        assert_eq!(
            names,
            vec!["Dailymotion", "Picstate", "Pixroute", "RapidVideo", "Sendvid", "WordPress"]
        );
    }

    #[test]
    fn test_for_enclosure() {
        let registry = PluginRegistry::builtin().unwrap();

        let plugin = registry
            .for_enclosure("https://www.dailymotion.com/video/x5abc")
            .unwrap();
        assert_eq!(plugin.descriptor().id, "dailymotion");

        assert!(registry.supports_enclosure("https://sendvid.com/abc"));
        assert!(!registry.supports_enclosure("https://example.com/video.mp4"));
    }

    #[test]
    fn test_for_article() {
        let registry = PluginRegistry::builtin().unwrap();
        let plugin = registry.for_article("http://picstate.com/view/full/1").unwrap();
        assert!(plugin.descriptor().supports(Capability::Articles));
        assert!(registry.for_article("https://sendvid.com/abc").is_none());
    }

    #[test]
    fn test_unknown_plugin() {
        let registry = PluginRegistry::builtin().unwrap();
        let result = registry.instance("youtube", Arc::new(StubFetcher::new()));
        assert!(matches!(result, Err(RilletError::PluginNotFound(id)) if id == "youtube"));
    }

    #[tokio::test]
    async fn test_instance_runs_plugin() {
        let registry = PluginRegistry::builtin().unwrap();
        let url = "https://videos2.sendvid.com/x/clip.mp4";

        let (instance, mut events) = registry
            .instance("sendvid", Arc::new(StubFetcher::new()))
            .unwrap();
        instance.get_enclosure(url, PluginSettings::new());

        match events.recv().await {
            Some(PluginEvent::Finished(Extraction::Enclosure(result))) => {
                assert_eq!(result.file_name, "clip.mp4");
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }
}
