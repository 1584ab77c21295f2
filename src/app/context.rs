use std::sync::Arc;
use std::time::Duration;

use crate::api::ApiClient;
use crate::app::error::Result;
use crate::config::Config;
use crate::plugins::{HttpPageFetcher, PageFetcher, PluginRegistry};
use crate::session::UpdateMonitor;
use crate::transport::{HttpTransport, Transport};

pub struct AppContext {
    pub config: Config,
    pub api: ApiClient,
    pub registry: PluginRegistry,
    pub page_fetcher: Arc<dyn PageFetcher>,
}

impl AppContext {
    pub fn new(config: Config) -> Result<Self> {
        let transport: Arc<dyn Transport> = Arc::new(HttpTransport::new(
            &config.server.address,
            config.server.credentials(),
        )?);
        let page_fetcher: Arc<dyn PageFetcher> = Arc::new(HttpPageFetcher::new()?);

        Self::with_parts(config, transport, page_fetcher)
    }

    /// Build a context around an existing transport and fetcher.
    pub fn with_parts(
        config: Config,
        transport: Arc<dyn Transport>,
        page_fetcher: Arc<dyn PageFetcher>,
    ) -> Result<Self> {
        Ok(Self {
            api: ApiClient::new(transport),
            registry: PluginRegistry::builtin()?,
            page_fetcher,
            config,
        })
    }

    pub fn update_monitor(&self) -> UpdateMonitor {
        let secs = self.config.monitor.poll_interval_secs.max(1);
        UpdateMonitor::with_interval(self.api.clone(), Duration::from_secs(secs))
    }
}
